use once_cell::sync::Lazy;
use regex::Regex;

/// Registration line: two Cyrillic name tokens, experience in months
/// (1-3 digits), and a duration-unit word.
#[allow(clippy::expect_used)]
static REGISTRATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([А-Яа-яёЁ]+) ([А-Яа-яёЁ]+) (\d{1,3}) (месяц|месяцев|месяца)$")
        .expect("registration pattern is valid")
});

/// Parsed registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub full_name: String,
    pub experience_months: i64,
}

/// Parses a registration line like `"Иван Петров 6 месяцев"`. Returns `None`
/// for anything that does not match the expected shape.
pub fn parse_registration(text: &str) -> Option<Registration> {
    let caps = REGISTRATION_RE.captures(text.trim())?;
    let full_name = format!("{} {}", &caps[1], &caps[2]);
    let experience_months = caps[3].parse().ok()?;
    Some(Registration {
        full_name,
        experience_months,
    })
}

/// Normalizes a submitted code word for lookup.
pub fn normalize_code_word(text: &str) -> String {
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_registration_line() {
        let parsed = parse_registration("Иван Петров 6 месяцев").unwrap();
        assert_eq!(parsed.full_name, "Иван Петров");
        assert_eq!(parsed.experience_months, 6);
    }

    #[test]
    fn accepts_all_duration_unit_forms() {
        assert!(parse_registration("Анна Сидорова 1 месяц").is_some());
        assert!(parse_registration("Анна Сидорова 2 месяца").is_some());
        assert!(parse_registration("Анна Сидорова 11 месяцев").is_some());
    }

    #[test]
    fn rejects_single_name_token() {
        assert!(parse_registration("Иван 6 месяцев").is_none());
    }

    #[test]
    fn rejects_latin_names_and_missing_unit() {
        assert!(parse_registration("Ivan Petrov 6 месяцев").is_none());
        assert!(parse_registration("Иван Петров 6").is_none());
        assert!(parse_registration("").is_none());
    }

    #[test]
    fn rejects_four_digit_experience() {
        assert!(parse_registration("Иван Петров 1234 месяцев").is_none());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert!(parse_registration("  Иван Петров 6 месяцев  ").is_some());
        assert_eq!(normalize_code_word("  добро  "), "добро");
    }
}
