//! Pulls routes and train numbers out of free text.

/// Words that end a destination name ("to Delhi on Friday").
const DESTINATION_STOP_WORDS: [&str; 9] = [
    "on", "tomorrow", "today", "tonight", "by", "for", "at", "via", "after",
];

const TRAIN_NUMBER_LEN: usize = 5;

fn strip_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| c.is_ascii_punctuation())
}

/// The `(source, destination)` of a "from X to Y" phrase.
///
/// Multi-word station names are kept; both ends must be non-empty.
pub fn route(text: &str) -> Option<(String, String)> {
    let words: Vec<&str> = text.split_whitespace().map(strip_punctuation).collect();
    let from = words.iter().position(|w| w.eq_ignore_ascii_case("from"))?;
    let to = from
        + 1
        + words[from + 1..]
            .iter()
            .position(|w| w.eq_ignore_ascii_case("to"))?;

    let source = words[from + 1..to].join(" ");
    let destination = words[to + 1..]
        .iter()
        .take_while(|w| {
            !DESTINATION_STOP_WORDS
                .iter()
                .any(|stop| w.eq_ignore_ascii_case(stop))
        })
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    if source.trim().is_empty() || destination.trim().is_empty() {
        return None;
    }
    Some((source, destination))
}

/// The first run of exactly five digits.
pub fn train_number(text: &str) -> Option<&str> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|run| run.len() == TRAIN_NUMBER_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_simple_route() {
        assert_eq!(
            route("Find trains from Pune to Goa"),
            Some(("Pune".into(), "Goa".into()))
        );
    }

    #[test]
    fn keeps_multi_word_stations_and_stops_at_dates() {
        assert_eq!(
            route("from New Delhi to Mumbai Central on Friday?"),
            Some(("New Delhi".into(), "Mumbai Central".into()))
        );
        assert_eq!(
            route("FROM Chennai TO Bengaluru."),
            Some(("Chennai".into(), "Bengaluru".into()))
        );
    }

    #[test]
    fn incomplete_routes_are_ignored() {
        assert_eq!(route("trains to Goa"), None);
        assert_eq!(route("from Pune"), None);
        assert_eq!(route("from to Goa"), None);
        assert_eq!(route("from Pune to tomorrow"), None);
    }

    #[test]
    fn finds_five_digit_numbers_only() {
        assert_eq!(train_number("Is 12301 available?"), Some("12301"));
        assert_eq!(train_number("PNR 1234567890 on train #12002"), Some("12002"));
        assert_eq!(train_number("seat 42 in coach 7"), None);
        assert_eq!(train_number(""), None);
    }
}
