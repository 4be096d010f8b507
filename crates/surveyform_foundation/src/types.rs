//! Canonical question types and function arities.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The closed set of canonical types every author-facing type token maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CanonicalType {
    /// Free text.
    Text,
    /// Whole number.
    Integer,
    /// Decimal number.
    Decimal,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    DateTime,
    /// Single location.
    Geopoint,
    /// Line of locations.
    Geotrace,
    /// Closed polygon of locations.
    Geoshape,
    /// Photo capture.
    Image,
    /// Audio capture.
    Audio,
    /// Video capture.
    Video,
    /// Arbitrary file attachment.
    File,
    /// Scanned barcode.
    Barcode,
    /// Single "OK" acknowledgement.
    Acknowledge,
    /// Choose one option from a list.
    SelectOne,
    /// Choose any number of options from a list.
    SelectMultiple,
    /// Read-only display text.
    Note,
    /// Hidden computed value.
    Calculate,
    /// Hidden stored value.
    Hidden,
    /// Form-open timestamp.
    Start,
    /// Form-close timestamp.
    End,
    /// Date the form was filled.
    Today,
    /// Device identifier.
    DeviceId,
    /// SIM subscriber identifier.
    SubscriberId,
    /// SIM serial number.
    SimSerial,
    /// Device phone number.
    PhoneNumber,
    /// Configured username.
    Username,
    /// Non-repeating container.
    Group,
    /// Repeating container.
    Repeat,
}

impl CanonicalType {
    /// Every canonical type, in declaration order.
    pub const ALL: [Self; 30] = [
        Self::Text,
        Self::Integer,
        Self::Decimal,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::Geopoint,
        Self::Geotrace,
        Self::Geoshape,
        Self::Image,
        Self::Audio,
        Self::Video,
        Self::File,
        Self::Barcode,
        Self::Acknowledge,
        Self::SelectOne,
        Self::SelectMultiple,
        Self::Note,
        Self::Calculate,
        Self::Hidden,
        Self::Start,
        Self::End,
        Self::Today,
        Self::DeviceId,
        Self::SubscriberId,
        Self::SimSerial,
        Self::PhoneNumber,
        Self::Username,
        Self::Group,
        Self::Repeat,
    ];

    /// Returns the canonical spelling used when emitting rows.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "dateTime",
            Self::Geopoint => "geopoint",
            Self::Geotrace => "geotrace",
            Self::Geoshape => "geoshape",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::File => "file",
            Self::Barcode => "barcode",
            Self::Acknowledge => "acknowledge",
            Self::SelectOne => "select_one",
            Self::SelectMultiple => "select_multiple",
            Self::Note => "note",
            Self::Calculate => "calculate",
            Self::Hidden => "hidden",
            Self::Start => "start",
            Self::End => "end",
            Self::Today => "today",
            Self::DeviceId => "deviceid",
            Self::SubscriberId => "subscriberid",
            Self::SimSerial => "simserial",
            Self::PhoneNumber => "phonenumber",
            Self::Username => "username",
            Self::Group => "group",
            Self::Repeat => "repeat",
        }
    }

    /// Returns true for types that take a choice list.
    #[must_use]
    pub const fn is_select(self) -> bool {
        matches!(self, Self::SelectOne | Self::SelectMultiple)
    }

    /// Returns true for container types (group, repeat).
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Group | Self::Repeat)
    }

    /// Returns true for values filled by the client rather than the respondent.
    #[must_use]
    pub const fn is_metadata(self) -> bool {
        matches!(
            self,
            Self::Start
                | Self::End
                | Self::Today
                | Self::DeviceId
                | Self::SubscriberId
                | Self::SimSerial
                | Self::PhoneNumber
                | Self::Username
        )
    }

    /// Returns true for media captures stored as binary attachments.
    #[must_use]
    pub const fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Audio | Self::Video | Self::File)
    }

    /// Returns true if questions of this type have no body control.
    #[must_use]
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Calculate | Self::Hidden) || self.is_metadata()
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Function arity specification.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Arity {
    /// Exactly N arguments.
    Exact(usize),
    /// Between min and max arguments (inclusive).
    Range(usize, usize),
    /// At least N arguments, then any number more.
    Variadic(usize),
}

impl Arity {
    /// Returns true if the given argument count satisfies this arity.
    #[must_use]
    pub const fn accepts(&self, count: usize) -> bool {
        match *self {
            Self::Exact(n) => count == n,
            Self::Range(min, max) => count >= min && count <= max,
            Self::Variadic(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Range(min, max) => write!(f, "{min}-{max}"),
            Self::Variadic(min) => write!(f, "{min}+"),
        }
    }
}

impl fmt::Debug for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
