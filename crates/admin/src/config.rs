//! Per-entity admin configuration.

/// A changelist filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    /// Filter on the field's stored value; choices come from the field kind.
    Field(&'static str),
    /// Country filter: choices are the countries in use, by name; lookups
    /// accept a code or a name.
    Country(&'static str),
}

impl ListFilter {
    pub fn field(self) -> &'static str {
        match self {
            ListFilter::Field(f) | ListFilter::Country(f) => f,
        }
    }
}

/// Child records edited together with their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inline {
    pub entity: &'static str,
    /// Foreign key of the child pointing at the parent.
    pub fk_field: &'static str,
    pub min_num: usize,
    pub max_num: usize,
    /// Blank child forms offered by an editor.
    pub extra: usize,
}

impl Inline {
    /// Exactly one child per parent.
    pub const fn single(entity: &'static str, fk_field: &'static str) -> Self {
        Self {
            entity,
            fk_field,
            min_num: 1,
            max_num: 1,
            extra: 1,
        }
    }
}

/// How one entity shows up in the admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAdmin {
    pub entity: &'static str,
    /// Changelist columns; empty shows the record label only.
    pub list_display: &'static [&'static str],
    pub list_filter: &'static [ListFilter],
    /// Default sort, `field` or `-field`.
    pub ordering: Option<&'static str>,
    pub inlines: &'static [Inline],
}

impl ModelAdmin {
    pub const fn new(entity: &'static str) -> Self {
        Self {
            entity,
            list_display: &[],
            list_filter: &[],
            ordering: None,
            inlines: &[],
        }
    }

    pub const fn list_display(mut self, fields: &'static [&'static str]) -> Self {
        self.list_display = fields;
        self
    }

    pub const fn list_filter(mut self, filters: &'static [ListFilter]) -> Self {
        self.list_filter = filters;
        self
    }

    pub const fn ordering(mut self, ordering: &'static str) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub const fn inlines(mut self, inlines: &'static [Inline]) -> Self {
        self.inlines = inlines;
        self
    }

    pub fn filter(&self, field: &str) -> Option<ListFilter> {
        self.list_filter.iter().copied().find(|f| f.field() == field)
    }

    pub fn inline(&self, entity: &str) -> Option<&Inline> {
        self.inlines.iter().find(|i| i.entity == entity)
    }
}
