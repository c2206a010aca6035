// Floor titles and curses shown while a floor loads.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorTheme {
    pub title: String,
    pub curse: String,
}

/// Source of per-floor flavor text. `None` means the provider had nothing to offer.
pub trait FloorThemes: Send {
    fn theme(&self, floor: u32) -> Option<FloorTheme>;
}

/// Always succeeds with a numbered title.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderThemes;

impl FloorThemes for PlaceholderThemes {
    fn theme(&self, floor: u32) -> Option<FloorTheme> {
        Some(placeholder(floor))
    }
}

fn placeholder(floor: u32) -> FloorTheme {
    FloorTheme {
        title: format!("FLOOR {floor}"),
        curse: "The connection is severed...".to_string(),
    }
}

/// A short hand-written catalog; floors past its end fall through to the placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogThemes;

static CATALOG: [(&str, &str); 4] = [
    ("The Cellar", "Darkness falls..."),
    ("Burning Basement", "You feel watched"),
    ("Dank Depths", "Something stirs below"),
    ("The Womb", "Lost forever"),
];

impl FloorThemes for CatalogThemes {
    fn theme(&self, floor: u32) -> Option<FloorTheme> {
        let index = usize::try_from(floor.checked_sub(1)?).ok()?;
        let (title, curse) = CATALOG.get(index)?;
        Some(FloorTheme {
            title: title.to_string(),
            curse: curse.to_string(),
        })
    }
}

pub fn theme_or_placeholder(themes: &dyn FloorThemes, floor: u32) -> FloorTheme {
    themes.theme(floor).unwrap_or_else(|| placeholder(floor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_catalog_has_an_entry_then_it_is_used() {
        let theme = theme_or_placeholder(&CatalogThemes, 2);
        assert_eq!(theme.title, "Burning Basement");
    }

    #[test]
    fn when_provider_has_nothing_then_placeholder_fills_in() {
        let theme = theme_or_placeholder(&CatalogThemes, 9);
        assert_eq!(theme, PlaceholderThemes.theme(9).unwrap());
        assert_eq!(theme.title, "FLOOR 9");
    }
}
