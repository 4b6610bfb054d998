#![forbid(unsafe_code)]

//! Plural rules.
//!
//! Plural phrases list their forms separated by `||||`, ordered by the
//! locale's [`PluralRule::forms`]. A count is categorized with
//! [`PluralRule::categorize`] and the matching position is picked with
//! [`PluralRule::form_index`].

/// CLDR plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

/// Built-in plural rule families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PluralRule {
    /// `one` for 1, `other` otherwise. Also German, Spanish, Italian, ...
    #[default]
    English,
    /// `one` for 0 and 1.
    French,
    /// `one` / `few` / `many` by last digits. Also Croatian, Lithuanian.
    Russian,
    /// `one` / `few` / `other`. Also Slovak.
    Czech,
    /// `one` / `few` / `many`.
    Polish,
    /// Six forms.
    Arabic,
    /// A single form. Chinese, Japanese, Korean, Thai, ...
    CJK,
}

impl PluralRule {
    /// Pick the rule for a locale tag such as `fr`, `pt-BR` or `ru_RU`.
    ///
    /// Matching is case-insensitive on the language subtag; unknown
    /// languages use [`PluralRule::English`].
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let lower = locale.to_ascii_lowercase();
        if lower == "pt-br" || lower == "pt_br" {
            return Self::French;
        }
        let language = lower.split(['-', '_']).next().unwrap_or_default();
        match language {
            "fr" | "tl" => Self::French,
            "ru" | "hr" | "lt" => Self::Russian,
            "cs" | "sk" => Self::Czech,
            "pl" => Self::Polish,
            "ar" => Self::Arabic,
            "zh" | "ja" | "ko" | "lo" | "ms" | "th" | "id" | "fa" | "tr" => Self::CJK,
            _ => Self::English,
        }
    }

    /// Categorize a count. Negative counts use their absolute value.
    #[must_use]
    pub fn categorize(self, count: i64) -> PluralCategory {
        let n = count.unsigned_abs();
        let last_two = n % 100;
        let last = n % 10;
        let teen = (12..=14).contains(&last_two);
        match self {
            Self::English => {
                if n == 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::French => {
                if n <= 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::Russian => {
                if last == 1 && last_two != 11 {
                    PluralCategory::One
                } else if (2..=4).contains(&last) && !teen {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            Self::Czech => match n {
                1 => PluralCategory::One,
                2..=4 => PluralCategory::Few,
                _ => PluralCategory::Other,
            },
            Self::Polish => {
                if n == 1 {
                    PluralCategory::One
                } else if (2..=4).contains(&last) && !teen {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            Self::Arabic => match n {
                0 => PluralCategory::Zero,
                1 => PluralCategory::One,
                2 => PluralCategory::Two,
                _ if (3..=10).contains(&last_two) => PluralCategory::Few,
                _ if last_two >= 11 => PluralCategory::Many,
                _ => PluralCategory::Other,
            },
            Self::CJK => PluralCategory::Other,
        }
    }

    /// Categories in the order a `||||` phrase lists its forms.
    #[must_use]
    pub fn forms(self) -> &'static [PluralCategory] {
        use PluralCategory::*;
        match self {
            Self::English | Self::French => &[One, Other],
            Self::Russian | Self::Polish => &[One, Few, Many],
            Self::Czech => &[One, Few, Other],
            Self::Arabic => &[Zero, One, Two, Few, Many, Other],
            Self::CJK => &[Other],
        }
    }

    /// Position of the form to use for `count`.
    #[must_use]
    pub fn form_index(self, count: i64) -> usize {
        let category = self.categorize(count);
        self.forms()
            .iter()
            .position(|form| *form == category)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_matching() {
        assert_eq!(PluralRule::for_locale("en"), PluralRule::English);
        assert_eq!(PluralRule::for_locale("en-US"), PluralRule::English);
        assert_eq!(PluralRule::for_locale("FR"), PluralRule::French);
        assert_eq!(PluralRule::for_locale("pt-BR"), PluralRule::French);
        assert_eq!(PluralRule::for_locale("pt"), PluralRule::English);
        assert_eq!(PluralRule::for_locale("ru_RU"), PluralRule::Russian);
        assert_eq!(PluralRule::for_locale("ja"), PluralRule::CJK);
        assert_eq!(PluralRule::for_locale(""), PluralRule::English);
        assert_eq!(PluralRule::for_locale("xx"), PluralRule::English);
    }

    #[test]
    fn russian_forms() {
        let rule = PluralRule::Russian;
        assert_eq!(rule.form_index(1), 0);
        assert_eq!(rule.form_index(21), 0);
        assert_eq!(rule.form_index(11), 2);
        assert_eq!(rule.form_index(3), 1);
        assert_eq!(rule.form_index(13), 2);
        assert_eq!(rule.form_index(25), 2);
    }

    #[test]
    fn polish_forms() {
        let rule = PluralRule::Polish;
        assert_eq!(rule.form_index(1), 0);
        assert_eq!(rule.form_index(21), 2);
        assert_eq!(rule.form_index(22), 1);
        assert_eq!(rule.form_index(12), 2);
    }

    #[test]
    fn arabic_forms() {
        let rule = PluralRule::Arabic;
        let indices: Vec<usize> = [0, 1, 2, 5, 11, 100]
            .into_iter()
            .map(|n| rule.form_index(n))
            .collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn english_and_french_differ_on_zero() {
        assert_eq!(PluralRule::English.form_index(0), 1);
        assert_eq!(PluralRule::French.form_index(0), 0);
    }

    #[test]
    fn every_category_is_listed_in_forms() {
        let rules = [
            PluralRule::English,
            PluralRule::French,
            PluralRule::Russian,
            PluralRule::Czech,
            PluralRule::Polish,
            PluralRule::Arabic,
            PluralRule::CJK,
        ];
        for rule in rules {
            for n in 0..250 {
                assert!(
                    rule.forms().contains(&rule.categorize(n)),
                    "{rule:?} categorized {n} outside its forms"
                );
            }
        }
    }
}
