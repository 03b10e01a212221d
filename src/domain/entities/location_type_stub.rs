//! LocationTypeStub - one row of the "types" sheet

use crate::domain::value_objects::{Row, TreeRef, ROOT_CODE};

/// Header names of the types sheet
pub struct TypeSheetHeaders;

impl TypeSheetHeaders {
    pub const NAME: &'static str = "name";
    pub const CODE: &'static str = "code";
    pub const PARENT_CODE: &'static str = "parent_code";
    pub const DO_DELETE: &'static str = "do_delete";
    pub const SHARES_CASES: &'static str = "shares_cases";
    pub const VIEW_DESCENDANTS: &'static str = "view_descendants";
    pub const EXPAND_FROM: &'static str = "expand_from";
    pub const SYNC_TO: &'static str = "sync_to";

    /// Headers every types sheet must carry
    pub const REQUIRED: [&'static str; 6] = [
        Self::NAME,
        Self::CODE,
        Self::PARENT_CODE,
        Self::DO_DELETE,
        Self::SHARES_CASES,
        Self::VIEW_DESCENDANTS,
    ];

    /// Headers a types sheet may carry
    pub const OPTIONAL: [&'static str; 2] = [Self::EXPAND_FROM, Self::SYNC_TO];
}

/// A proposed location type, as listed in the upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTypeStub {
    pub name: String,
    pub code: String,
    pub parent_code: TreeRef,
    pub do_delete: bool,
    pub shares_cases: bool,
    pub view_descendants: bool,
    /// Ancestor (or the type itself, or `TOP`) to derive consumption data from
    pub expand_from: Option<TreeRef>,
    /// Descendant (or the type itself) to propagate data down to
    pub sync_to: Option<String>,
    /// Row position in the sheet, for messages
    pub index: usize,
}

impl LocationTypeStub {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        parent_code: TreeRef,
        index: usize,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            parent_code,
            do_delete: false,
            shares_cases: false,
            view_descendants: false,
            expand_from: None,
            sync_to: None,
            index,
        }
    }

    /// Parse a types-sheet row.
    ///
    /// A blank parent means "top-level"; whether that is acceptable is for
    /// the validator to decide, never a parse error.
    pub fn from_row(row: &Row, index: usize) -> Self {
        let expand_from = row.get(TypeSheetHeaders::EXPAND_FROM).map(|raw| {
            if raw.eq_ignore_ascii_case(ROOT_CODE) {
                TreeRef::Root
            } else {
                TreeRef::code_of(raw)
            }
        });

        Self {
            name: row.get_string(TypeSheetHeaders::NAME).unwrap_or_default(),
            code: row.get_string(TypeSheetHeaders::CODE).unwrap_or_default(),
            parent_code: TreeRef::from_code(row.get(TypeSheetHeaders::PARENT_CODE)),
            do_delete: row.flag(TypeSheetHeaders::DO_DELETE),
            shares_cases: row.flag(TypeSheetHeaders::SHARES_CASES),
            view_descendants: row.flag(TypeSheetHeaders::VIEW_DESCENDANTS),
            expand_from,
            sync_to: row.get_string(TypeSheetHeaders::SYNC_TO),
            index,
        }
    }

    pub fn with_parent(mut self, parent_code: &str) -> Self {
        self.parent_code = TreeRef::from_code(Some(parent_code));
        self
    }

    pub fn marked_for_delete(mut self) -> Self {
        self.do_delete = true;
        self
    }

    pub fn with_flags(mut self, shares_cases: bool, view_descendants: bool) -> Self {
        self.shares_cases = shares_cases;
        self.view_descendants = view_descendants;
        self
    }

    pub fn with_expansion(mut self, expand_from: Option<TreeRef>, sync_to: Option<&str>) -> Self {
        self.expand_from = expand_from;
        self.sync_to = sync_to.map(str::to_string);
        self
    }
}
