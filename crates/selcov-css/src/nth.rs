use std::fmt;

/// [§ 6.6.5.1 An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
///
/// "The An+B notation defines an integer step (A) and offset (B), and
/// represents the An+Bth elements in a list, for every positive integer or
/// zero value of n, with the first element in the list having index 1."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    /// Step.
    pub a: i64,
    /// Offset.
    pub b: i64,
}

impl Nth {
    /// Build an expression from its step and offset.
    #[must_use]
    pub const fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    /// Parse `odd`, `even`, `B`, `An`, `An+B` and `An-B` forms.
    ///
    /// Keywords and the `n` are ASCII case-insensitive. Whitespace is allowed
    /// at either end and on either side of the sign of `B`, nowhere else.
    ///
    /// ```
    /// use selcov_css::Nth;
    ///
    /// assert_eq!(Nth::parse("2n+1"), Some(Nth::new(2, 1)));
    /// assert_eq!(Nth::parse(" -n + 3 "), Some(Nth::new(-1, 3)));
    /// assert_eq!(Nth::parse("even"), Some(Nth::new(2, 0)));
    /// assert_eq!(Nth::parse("n-"), None);
    /// assert_eq!(Nth::parse("1 0n+1"), None);
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let text = input
            .trim_matches(|c: char| c.is_ascii_whitespace())
            .to_ascii_lowercase();

        match text.as_str() {
            "" => return None,
            "odd" => return Some(Self::new(2, 1)),
            "even" => return Some(Self::new(2, 0)),
            _ => {}
        }

        let Some(n_pos) = text.find('n') else {
            return parse_signed(&text).map(|b| Self::new(0, b));
        };

        let a = match &text[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            step => parse_signed(step)?,
        };

        let offset = text[n_pos + 1..].trim_start_matches(|c: char| c.is_ascii_whitespace());
        if offset.is_empty() {
            return Some(Self::new(a, 0));
        }
        let (negative, digits) = if let Some(rest) = offset.strip_prefix('+') {
            (false, rest)
        } else if let Some(rest) = offset.strip_prefix('-') {
            (true, rest)
        } else {
            return None;
        };
        let b = parse_digits(digits.trim_start_matches(|c: char| c.is_ascii_whitespace()))?;
        Some(Self::new(a, if negative { -b } else { b }))
    }

    /// Whether the 1-based `index` is represented by this expression for
    /// some `n >= 0`.
    #[must_use]
    pub const fn matches(self, index: i64) -> bool {
        if self.a == 0 {
            return index == self.b;
        }
        let Some(diff) = index.checked_sub(self.b) else {
            return false;
        };
        match (diff.checked_rem(self.a), diff.checked_div(self.a)) {
            (Some(0), Some(n)) => n >= 0,
            _ => false,
        }
    }
}

/// Optional sign followed by ASCII digits only.
fn parse_signed(text: &str) -> Option<i64> {
    match text.strip_prefix('-') {
        Some(digits) => parse_digits(digits).map(|value| -value),
        None => parse_digits(text.strip_prefix('+').unwrap_or(text)),
    }
}

/// ASCII digits only, no sign.
fn parse_digits(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for Nth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.a, self.b) {
            (0, b) => write!(f, "{b}"),
            (a, 0) => write!(f, "{a}n"),
            (a, b) if b < 0 => write!(f, "{a}n{b}"),
            (a, b) => write!(f, "{a}n+{b}"),
        }
    }
}
