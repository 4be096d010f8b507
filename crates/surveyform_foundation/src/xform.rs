//! XForm vocabulary shared by the reader and the emitter.
//!
//! Element and attribute names, the bind type and preload of each canonical
//! type, and the small reference syntaxes (`jr:itext('…')`,
//! `instance('…')/root/item`) both directions must agree on.

use crate::types::CanonicalType;

/// Default XForms namespace.
pub const XFORMS_NS: &str = "http://www.w3.org/2002/xforms";
/// XHTML namespace, bound to `h`.
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
/// JavaRosa namespace, bound to `jr`.
pub const JAVAROSA_NS: &str = "http://openrosa.org/javarosa";
/// ODK namespace, bound to `odk`.
pub const ODK_NS: &str = "http://www.opendatakit.org/xforms";

/// Marks a repeat's template in the primary instance.
pub const TEMPLATE_ATTR: &str = "jr:template";
/// Bind attribute carrying the constraint message.
pub const CONSTRAINT_MSG_ATTR: &str = "jr:constraintMsg";
/// Bind attribute naming a preload source.
pub const PRELOAD_ATTR: &str = "jr:preload";
/// Bind attribute naming the preloaded value.
pub const PRELOAD_PARAMS_ATTR: &str = "jr:preloadParams";
/// XPath true, as written in `required` and `readonly`.
pub const XPATH_TRUE: &str = "true()";

/// Suffix of label itext ids.
pub const LABEL_SUFFIX: &str = "label";
/// Suffix of hint itext ids.
pub const HINT_SUFFIX: &str = "hint";
/// Suffix of constraint message itext ids.
pub const CONSTRAINT_MSG_SUFFIX: &str = "jr:constraintMsg";

/// Returns the `type` attribute of a question's bind.
#[must_use]
pub const fn bind_type(qtype: CanonicalType) -> &'static str {
    match qtype {
        CanonicalType::Integer => "int",
        CanonicalType::Decimal => "decimal",
        CanonicalType::Date | CanonicalType::Today => "date",
        CanonicalType::Time => "time",
        CanonicalType::DateTime | CanonicalType::Start | CanonicalType::End => "dateTime",
        CanonicalType::Geopoint => "geopoint",
        CanonicalType::Geotrace => "geotrace",
        CanonicalType::Geoshape => "geoshape",
        CanonicalType::Image | CanonicalType::Audio | CanonicalType::Video | CanonicalType::File => {
            "binary"
        }
        CanonicalType::Barcode => "barcode",
        _ => "string",
    }
}

/// Returns the input type a bind `type` implies for an `input` control.
#[must_use]
pub fn input_type(bind: &str) -> Option<CanonicalType> {
    Some(match bind.rsplit(':').next().unwrap_or(bind) {
        "string" => CanonicalType::Text,
        "int" | "integer" => CanonicalType::Integer,
        "decimal" => CanonicalType::Decimal,
        "date" => CanonicalType::Date,
        "time" => CanonicalType::Time,
        "dateTime" => CanonicalType::DateTime,
        "geopoint" => CanonicalType::Geopoint,
        "geotrace" => CanonicalType::Geotrace,
        "geoshape" => CanonicalType::Geoshape,
        "binary" => CanonicalType::File,
        "barcode" => CanonicalType::Barcode,
        "select1" => CanonicalType::SelectOne,
        "select" => CanonicalType::SelectMultiple,
        _ => return None,
    })
}

const PRELOADS: &[(CanonicalType, &str, &str)] = &[
    (CanonicalType::Start, "timestamp", "start"),
    (CanonicalType::End, "timestamp", "end"),
    (CanonicalType::Today, "date", "today"),
    (CanonicalType::DeviceId, "property", "deviceid"),
    (CanonicalType::SubscriberId, "property", "subscriberid"),
    (CanonicalType::SimSerial, "property", "simserial"),
    (CanonicalType::PhoneNumber, "property", "phonenumber"),
    (CanonicalType::Username, "property", "username"),
];

/// Returns the `(jr:preload, jr:preloadParams)` pair of a metadata type.
#[must_use]
pub fn preload(qtype: CanonicalType) -> Option<(&'static str, &'static str)> {
    PRELOADS
        .iter()
        .find(|(candidate, _, _)| *candidate == qtype)
        .map(|&(_, preload, params)| (preload, params))
}

/// Returns the metadata type a preload pair fills.
#[must_use]
pub fn from_preload(preload: &str, params: &str) -> Option<CanonicalType> {
    PRELOADS
        .iter()
        .find(|(_, p, q)| *p == preload && *q == params)
        .map(|&(qtype, _, _)| qtype)
}

/// Returns the `mediatype` of an `upload` control.
#[must_use]
pub const fn mediatype(qtype: CanonicalType) -> Option<&'static str> {
    match qtype {
        CanonicalType::Image => Some("image/*"),
        CanonicalType::Audio => Some("audio/*"),
        CanonicalType::Video => Some("video/*"),
        CanonicalType::File => Some("application/*"),
        _ => None,
    }
}

/// Returns the media type an `upload` control captures.
#[must_use]
pub fn from_mediatype(mediatype: &str) -> CanonicalType {
    match mediatype.split('/').next().unwrap_or_default() {
        "image" => CanonicalType::Image,
        "audio" => CanonicalType::Audio,
        "video" => CanonicalType::Video,
        _ => CanonicalType::File,
    }
}

/// Renders an itext reference, e.g. `jr:itext('/data/q:label')`.
#[must_use]
pub fn itext_ref(id: &str) -> String {
    format!("jr:itext('{id}')")
}

/// Extracts the id from an itext reference.
#[must_use]
pub fn parse_itext_ref(text: &str) -> Option<&str> {
    let inner = text.trim().strip_prefix("jr:itext(")?.strip_suffix(')')?;
    unquote(inner.trim())
}

/// Renders the itemset nodeset of a choice list.
#[must_use]
pub fn itemset_nodeset(list: &str) -> String {
    format!("instance('{list}')/root/item")
}

/// Extracts the list name from an itemset nodeset.
///
/// Any predicate after `item` (a choice filter) is ignored.
#[must_use]
pub fn parse_itemset_nodeset(nodeset: &str) -> Option<&str> {
    let rest = nodeset.trim().strip_prefix("instance(")?;
    let close = rest.find(')')?;
    unquote(rest[..close].trim())
}

fn unquote(text: &str) -> Option<&str> {
    text.strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .or_else(|| text.strip_prefix('"').and_then(|t| t.strip_suffix('"')))
}
