use crate::domain::slot::Slot;

/// Best-effort extraction of a delivery time from free text: the first
/// 1–2 digit hour followed by an exactly-2-digit minute, separated by
/// `:`, `.`, whitespace, or the word "e" ("19:15", "19.15", "19 e 15").
/// Out-of-range values reject the extraction outright; minutes are
/// floored to the 15-minute grid. Malformed input yields `None`, which
/// drives a re-prompt rather than a guess.
pub fn extract_slot(text: &str) -> Option<Slot> {
    let chars: Vec<char> = text.chars().collect();
    let start = chars.iter().position(|c| c.is_ascii_digit())?;

    let mut index = start;
    let mut hour = 0u32;
    while index < chars.len() && chars[index].is_ascii_digit() && index - start < 2 {
        hour = hour * 10 + chars[index].to_digit(10)?;
        index += 1;
    }

    while index < chars.len() && is_separator(chars[index]) {
        index += 1;
    }

    let (Some(&tens), Some(&units)) = (chars.get(index), chars.get(index + 1)) else {
        return None;
    };
    if !tens.is_ascii_digit() || !units.is_ascii_digit() {
        return None;
    }
    let minute = tens.to_digit(10)? * 10 + units.to_digit(10)?;

    Slot::from_extracted(hour, minute)
}

fn is_separator(c: char) -> bool {
    c == ':' || c == '.' || c == 'e' || c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::extract_slot;

    #[test]
    fn parses_colon_dot_and_spoken_separators() {
        assert_eq!(extract_slot("verso le 19:15").map(|s| s.to_string()), Some("19:15".into()));
        assert_eq!(extract_slot("20.05").map(|s| s.to_string()), Some("20:00".into()));
        assert_eq!(extract_slot("alle 19 e 37").map(|s| s.to_string()), Some("19:30".into()));
        assert_eq!(extract_slot("2130 va bene").map(|s| s.to_string()), Some("21:30".into()));
    }

    #[test]
    fn rejects_out_of_range_times() {
        assert_eq!(extract_slot("ore 25:10"), None);
        assert_eq!(extract_slot("alle 19:72"), None);
    }

    #[test]
    fn rejects_text_without_a_time() {
        assert_eq!(extract_slot("il prima possibile"), None);
        assert_eq!(extract_slot("alle 19"), None);
        assert_eq!(extract_slot(""), None);
    }

    #[test]
    fn minutes_floor_to_the_quarter_hour() {
        assert_eq!(extract_slot("19:59").map(|s| s.to_string()), Some("19:45".into()));
        assert_eq!(extract_slot("19:00").map(|s| s.to_string()), Some("19:00".into()));
    }
}
