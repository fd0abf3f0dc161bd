use crate::domain::menu::ItemCategory;

#[derive(Clone, Debug)]
struct LexiconEntry {
    alias: String,
    canonical: String,
}

/// Fixed alias → canonical-name table for one item category, used for
/// literal free-text item spotting. Not NLU: an alias either occurs as a
/// substring of the lowercased message or it does not.
#[derive(Clone, Debug)]
pub struct Lexicon {
    category: ItemCategory,
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    /// Builds a lexicon from `(alias, canonical)` pairs. Aliases are kept
    /// longest-first so that multi-word aliases ("coca cola") are checked
    /// and consumed before their shorter overlaps ("coca").
    pub fn new(category: ItemCategory, pairs: &[(&str, &str)]) -> Self {
        let mut entries: Vec<LexiconEntry> = pairs
            .iter()
            .map(|(alias, canonical)| LexiconEntry {
                alias: alias.to_lowercase(),
                canonical: (*canonical).to_owned(),
            })
            .collect();
        entries.sort_by(|a, b| b.alias.len().cmp(&a.alias.len()));
        Self { category, entries }
    }

    pub fn category(&self) -> ItemCategory {
        self.category
    }

    pub fn default_mains() -> Self {
        Self::new(
            ItemCategory::Mains,
            &[
                ("margherit", "Margherita"),
                ("diavol", "Diavola"),
                ("4 stagioni", "Quattro Stagioni"),
                ("quattro stagioni", "Quattro Stagioni"),
                ("marinara", "Marinara"),
                ("napoli", "Napoletana"),
                ("capricciosa", "Capricciosa"),
            ],
        )
    }

    pub fn default_sides() -> Self {
        Self::new(
            ItemCategory::Sides,
            &[
                ("patatine", "Patatine"),
                ("crocchette", "Crocchette"),
                ("suppl", "Supplì"),
                ("arancin", "Arancini"),
            ],
        )
    }

    pub fn default_drinks() -> Self {
        Self::new(
            ItemCategory::Drinks,
            &[
                ("acqua", "Acqua"),
                ("coca cola", "Coca Cola"),
                ("coca-cola", "Coca Cola"),
                ("coca", "Coca Cola"),
                ("pepsi", "Pepsi"),
                ("fanta", "Fanta"),
                ("sprite", "Sprite"),
                ("birra", "Birra"),
                ("vino", "Vino"),
            ],
        )
    }

    /// Spots known items in free text, returning `(canonical, quantity)`
    /// pairs. Matched alias occurrences are cut out of the working copy so
    /// overlapping aliases cannot double-count, and each canonical name is
    /// reported at most once per invocation. No match is an empty result.
    pub fn match_items(&self, text: &str) -> Vec<(String, u32)> {
        let mut working = text.to_lowercase();
        let mut found: Vec<(String, u32)> = Vec::new();

        for entry in &self.entries {
            let Some(position) = working.find(entry.alias.as_str()) else {
                continue;
            };
            let quantity = leading_quantity(&working[..position]).unwrap_or(1);
            working.replace_range(position..position + entry.alias.len(), "");

            if !found.iter().any(|(canonical, _)| canonical == &entry.canonical) {
                found.push((entry.canonical.clone(), quantity));
            }
        }

        found
    }
}

/// Looks for a digit sequence immediately before an alias occurrence,
/// allowing one filler word in between ("2 porzioni patatine").
fn leading_quantity(prefix: &str) -> Option<u32> {
    let mut tokens = prefix.split_whitespace().rev();
    let last = tokens.next()?;
    if let Ok(quantity) = last.parse::<u32>() {
        return Some(quantity);
    }
    if !last.chars().all(char::is_alphabetic) {
        return None;
    }
    tokens.next()?.parse::<u32>().ok()
}
