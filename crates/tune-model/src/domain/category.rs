use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute category derived from the attribute name prefix.
///
/// - `Delay`: `delay*`, artificial latency in milliseconds.
/// - `Int`: `int*`, integer values.
/// - `String`: `string*`, text values.
/// - `Is`: `is*`, boolean flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Delay,
    Int,
    String,
    Is,
}

impl Category {
    /// All categories in document order.
    pub const ALL: [Category; 4] = [
        Category::Delay,
        Category::Int,
        Category::String,
        Category::Is,
    ];

    /// Canonical (lowercase) name prefix.
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Category::Delay => "delay",
            Category::Int => "int",
            Category::String => "string",
            Category::Is => "is",
        }
    }

    /// Key of the category mapping inside a [`crate::ConfigDocument`].
    #[inline]
    pub const fn wire_key(&self) -> &'static str {
        match self {
            Category::Delay => "delays",
            Category::Int => "intParams",
            Category::String => "stringParams",
            Category::Is => "booleanVariables",
        }
    }

    /// Returns `true` if `name` starts with this category prefix written in
    /// lowercase (`delayX`), uppercase (`DELAY_X`) or capitalized (`DelayX`) form.
    ///
    /// Mixed casing such as `dElayX` does not match.
    pub fn matches(&self, name: &str) -> bool {
        let lower = self.prefix();
        let Some(rest) = name.get(..lower.len()) else {
            return false;
        };
        if rest == lower || rest == lower.to_ascii_uppercase() {
            return true;
        }
        let mut chars = rest.chars();
        match chars.next() {
            Some(first) => {
                first.is_ascii_uppercase()
                    && first.to_ascii_lowercase() == lower.as_bytes()[0] as char
                    && chars.as_str() == &lower[1..]
            }
            None => false,
        }
    }

    /// Classify an attribute name by prefix.
    ///
    /// # Examples
    /// ```
    /// use tune_model::Category;
    ///
    /// assert_eq!(Category::classify("delayHelloWorld"), Some(Category::Delay));
    /// assert_eq!(Category::classify("IS_USER_ACTIVE"), Some(Category::Is));
    /// assert_eq!(Category::classify("timeout"), None);
    /// ```
    pub fn classify(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.matches(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_all_supported_casings() {
        for name in ["delayX", "DelayX", "DELAY_X"] {
            assert_eq!(Category::classify(name), Some(Category::Delay), "{name}");
        }
        for name in ["intUserId", "IntUserId", "INT_USER_ID"] {
            assert_eq!(Category::classify(name), Some(Category::Int), "{name}");
        }
        for name in ["stringHell", "StringHell", "STRING_USER_STATUS"] {
            assert_eq!(Category::classify(name), Some(Category::String), "{name}");
        }
        for name in ["isHealthTrue", "IsHealthTrue", "IS_USER_ACTIVE"] {
            assert_eq!(Category::classify(name), Some(Category::Is), "{name}");
        }
    }

    #[test]
    fn rejects_mixed_case_and_unknown_prefixes() {
        for name in ["dElayX", "iNt", "sTRING", "iS", "timeout", "", "de", "healthy"] {
            assert_eq!(Category::classify(name), None, "{name}");
        }
    }

    #[test]
    fn categories_are_disjoint() {
        for name in ["delayA", "intA", "stringA", "isA", "INSIDE", "Issue"] {
            let hits = Category::ALL.iter().filter(|c| c.matches(name)).count();
            assert!(hits <= 1, "{name} matched {hits} categories");
        }
    }

    #[test]
    fn prefix_alone_is_a_match() {
        assert_eq!(Category::classify("is"), Some(Category::Is));
        assert_eq!(Category::classify("DELAY"), Some(Category::Delay));
    }

    #[test]
    fn wire_keys_match_document_fields() {
        let keys: Vec<_> = Category::ALL.iter().map(|c| c.wire_key()).collect();
        assert_eq!(keys, ["delays", "intParams", "stringParams", "booleanVariables"]);
    }
}
