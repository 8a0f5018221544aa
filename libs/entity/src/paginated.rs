use serde::Serialize;

/// One page of a listing. `number` is 1-based; an empty listing still has
/// one (empty) page.
#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
}

impl<T> Paginated<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_previous() || self.has_next()
    }

    pub fn previous_page_number(&self) -> u64 {
        self.number.saturating_sub(1).max(1)
    }

    pub fn next_page_number(&self) -> u64 {
        (self.number + 1).min(self.num_pages.max(1))
    }
}

/// Resolves the raw `page` query value against the number of pages.
///
/// Missing or non-numeric values give the first page, numbers outside
/// `1..=num_pages` give the last one.
pub fn resolve_page_number(raw: Option<&str>, num_pages: u64) -> u64 {
    let num_pages = num_pages.max(1);
    let Some(raw) = raw else {
        return 1;
    };
    match raw.trim().parse::<i64>() {
        Ok(number) if number >= 1 && (number as u64) <= num_pages => {
            number as u64
        }
        Ok(_) => num_pages,
        Err(_) => 1,
    }
}
