//! Schema-checked sheet rows.
//!
//! Raw [`Row`]s are untyped column maps. Each sheet has a fixed schema;
//! rows are checked against it on ingestion so the builder only ever sees
//! typed values. Rows are numbered the way a spreadsheet shows them: the
//! header is row 1, the first data row is row 2.

use indexmap::IndexMap;
use surveyform_document::Settings;
use surveyform_expression::is_valid_name;
use surveyform_foundation::{
    DEFAULT_LANGUAGE, Error, ErrorContext, Result, Row, Text, TypeToken, split_language,
};
use tracing::trace;

use crate::config::BuildConfig;

/// Name of the survey sheet, used in error context.
pub const SURVEY_SHEET: &str = "survey";
/// Name of the choices sheet, used in error context.
pub const CHOICES_SHEET: &str = "choices";
/// Name of the settings sheet, used in error context.
pub const SETTINGS_SHEET: &str = "settings";

/// Returns the spreadsheet row number of the data row at `index`.
#[must_use]
pub const fn sheet_row(index: usize) -> usize {
    index + 2
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SurveyColumn {
    Type,
    Name,
    Label,
    Hint,
    Required,
    Relevant,
    Constraint,
    ConstraintMessage,
    Calculation,
    Default,
    Appearance,
}

impl SurveyColumn {
    fn parse(base: &str) -> Option<Self> {
        Some(match base {
            "type" => Self::Type,
            "name" => Self::Name,
            "label" => Self::Label,
            "hint" => Self::Hint,
            "required" => Self::Required,
            "relevant" => Self::Relevant,
            "constraint" => Self::Constraint,
            "constraint_message" => Self::ConstraintMessage,
            "calculation" => Self::Calculation,
            "default" => Self::Default,
            "appearance" => Self::Appearance,
            _ => return None,
        })
    }

    const fn is_translatable(self) -> bool {
        matches!(self, Self::Label | Self::Hint | Self::ConstraintMessage)
    }
}

/// A checked survey sheet row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurveyRow {
    /// Parsed `type` cell.
    pub token: TypeToken,
    /// `name` cell.
    pub name: Option<String>,
    /// `label` and `label::<lang>` cells.
    pub label: Text,
    /// `hint` and `hint::<lang>` cells.
    pub hint: Text,
    /// `required` cell.
    pub required: bool,
    /// `relevant` cell, flat syntax.
    pub relevant: Option<String>,
    /// `constraint` cell, flat syntax.
    pub constraint: Option<String>,
    /// `constraint_message` and `constraint_message::<lang>` cells.
    pub constraint_message: Text,
    /// `calculation` cell, flat syntax.
    pub calculation: Option<String>,
    /// `default` cell.
    pub default: Option<String>,
    /// `appearance` cell.
    pub appearance: Option<String>,
}

impl SurveyRow {
    /// Checks a raw survey row.
    ///
    /// # Errors
    /// Returns `MalformedRow` for a missing type, an unknown or misused
    /// column, an invalid name or boolean, and `UnknownType` for an
    /// unrecognized type token. Errors carry the sheet and row number.
    pub fn parse(row: &Row, line: usize, config: &BuildConfig) -> Result<Self> {
        let context = ErrorContext::new().with_sheet(SURVEY_SHEET).with_row(line);
        let context = match row.get("name") {
            Some(name) => context.with_node(name.trim()),
            None => context,
        };

        let Some(raw_type) = row.get("type") else {
            return Err(Error::malformed_row("row has no type").with_context(context));
        };
        let token = TypeToken::parse(raw_type).map_err(|e| e.with_context(context.clone()))?;

        let mut parsed = Self {
            token,
            name: None,
            label: Text::new(),
            hint: Text::new(),
            required: false,
            relevant: None,
            constraint: None,
            constraint_message: Text::new(),
            calculation: None,
            default: None,
            appearance: None,
        };

        for (column, value) in row.cells() {
            let (base, language) = split_language(column);
            let Some(kind) = SurveyColumn::parse(base) else {
                if config.strict_columns {
                    return Err(Error::malformed_row(format!("unknown column `{column}`"))
                        .with_context(context));
                }
                trace!(column, "ignoring unknown survey column");
                continue;
            };
            if language.is_some() && !kind.is_translatable() {
                return Err(Error::malformed_row(format!(
                    "column `{base}` cannot be translated"
                ))
                .with_context(context));
            }
            let language = language.unwrap_or(DEFAULT_LANGUAGE);

            match kind {
                SurveyColumn::Type => {}
                SurveyColumn::Name => {
                    let name = value.trim();
                    if !is_valid_name(name) {
                        return Err(Error::malformed_row(format!("invalid name `{name}`"))
                            .with_context(context));
                    }
                    parsed.name = Some(name.to_string());
                }
                SurveyColumn::Label => parsed.label.insert(language, value.trim()),
                SurveyColumn::Hint => parsed.hint.insert(language, value.trim()),
                SurveyColumn::ConstraintMessage => {
                    parsed.constraint_message.insert(language, value.trim());
                }
                SurveyColumn::Required => {
                    parsed.required = parse_bool(value).ok_or_else(|| {
                        Error::malformed_row(format!("invalid boolean `{value}` in `required`"))
                            .with_context(context.clone())
                    })?;
                }
                SurveyColumn::Relevant => parsed.relevant = Some(value.trim().to_string()),
                SurveyColumn::Constraint => parsed.constraint = Some(value.trim().to_string()),
                SurveyColumn::Calculation => parsed.calculation = Some(value.trim().to_string()),
                SurveyColumn::Default => parsed.default = Some(value.trim().to_string()),
                SurveyColumn::Appearance => parsed.appearance = Some(value.trim().to_string()),
            }
        }

        Ok(parsed)
    }
}

/// A checked choices sheet row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceRow {
    /// `list_name` cell.
    pub list_name: String,
    /// `name` cell.
    pub name: String,
    /// `label` and `label::<lang>` cells.
    pub label: Text,
    /// Every other non-empty cell, in column order.
    pub extras: IndexMap<String, String>,
}

impl ChoiceRow {
    /// Checks a raw choices row.
    ///
    /// # Errors
    /// Returns `MalformedRow` if `list_name` or `name` is missing.
    pub fn parse(row: &Row, line: usize) -> Result<Self> {
        let context = ErrorContext::new().with_sheet(CHOICES_SHEET).with_row(line);
        let required = |column: &str| {
            row.get(column).map(|v| v.trim().to_string()).ok_or_else(|| {
                Error::malformed_row(format!("choice has no `{column}`"))
                    .with_context(context.clone())
            })
        };
        let list_name = required("list_name")?;
        let name = required("name")?;

        let mut label = Text::new();
        let mut extras = IndexMap::new();
        for (column, value) in row.cells() {
            match split_language(column) {
                ("list_name" | "name", None) => {}
                ("label", language) => {
                    label.insert(language.unwrap_or(DEFAULT_LANGUAGE), value.trim());
                }
                _ => {
                    extras.insert(column.to_string(), value.trim().to_string());
                }
            }
        }

        Ok(Self {
            list_name,
            name,
            label,
            extras,
        })
    }
}

/// The checked settings row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsRow {
    /// Document settings.
    pub settings: Settings,
    /// Root element name from the `name` column.
    pub root_name: Option<String>,
}

impl SettingsRow {
    /// Checks the raw settings row, if any.
    ///
    /// # Errors
    /// Returns `MalformedRow` for an unknown column under strict columns or
    /// an invalid root name.
    pub fn parse(row: Option<&Row>, config: &BuildConfig) -> Result<Self> {
        let mut parsed = Self::default();
        let Some(row) = row else {
            return Ok(parsed);
        };
        let context = ErrorContext::new()
            .with_sheet(SETTINGS_SHEET)
            .with_row(sheet_row(0));

        for (column, value) in row.cells() {
            let value = value.trim().to_string();
            match column {
                "form_title" => parsed.settings.title = Some(value),
                "form_id" => parsed.settings.form_id = Some(value),
                "version" => parsed.settings.version = Some(value),
                "default_language" => parsed.settings.default_language = Some(value),
                "submission_url" => parsed.settings.submission_url = Some(value),
                "name" => {
                    if !is_valid_name(&value) {
                        return Err(Error::malformed_row(format!("invalid root name `{value}`"))
                            .with_context(context));
                    }
                    parsed.root_name = Some(value);
                }
                _ if config.strict_columns => {
                    return Err(Error::malformed_row(format!("unknown column `{column}`"))
                        .with_context(context));
                }
                _ => trace!(column, "ignoring unknown settings column"),
            }
        }
        Ok(parsed)
    }
}

/// Parses the boolean spellings accepted in the `required` column.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "true" | "1" | "true()" => Some(true),
        "no" | "false" | "0" | "false()" => Some(false),
        _ => None,
    }
}
