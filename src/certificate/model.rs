//! Identity record and the closed set of travel reasons.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Identity block stamped onto the certificate.
///
/// All fields are plain text taken verbatim from the configuration; the only
/// requirement is that they are present. `birthday` is a localized date
/// string (e.g. "08/08/1987") and is never parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonalInformation {
    pub lastname: String,
    pub firstname: String,
    pub birthday: String,
    pub placeofbirth: String,
    pub address: String,
    pub zipcode: String,
    pub town: String,
}

impl PersonalInformation {
    /// Name as printed on the form, given name first.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// Single-line postal address, as printed and as carried by the QR payload.
    pub fn full_address(&self) -> String {
        format!("{} {} {}", self.address, self.zipcode, self.town)
    }
}

/// Travel reasons recognized by the official form.
///
/// Each reason has a canonical short code (the vocabulary of the QR payload)
/// and a fixed vertical checkbox position on page 1 of the template. The
/// template's coordinate layout is a pinned external contract; the offsets
/// here must not be derived or adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    Work,
    Shopping,
    Leisure,
    Health,
    Family,
    Disability,
    Summons,
    ProfessionalMission,
    Children,
}

impl Reason {
    pub const ALL: [Reason; 9] = [
        Reason::Work,
        Reason::Shopping,
        Reason::Leisure,
        Reason::Health,
        Reason::Family,
        Reason::Disability,
        Reason::Summons,
        Reason::ProfessionalMission,
        Reason::Children,
    ];

    /// Canonical short code used in the QR audit payload.
    pub fn code(self) -> &'static str {
        match self {
            Reason::Work => "travail",
            Reason::Shopping => "achats",
            Reason::Leisure => "sport_animaux",
            Reason::Health => "sante",
            Reason::Family => "famille",
            Reason::Disability => "handicap",
            Reason::Summons => "convocation",
            Reason::ProfessionalMission => "missions",
            Reason::Children => "enfants",
        }
    }

    /// Vertical position of this reason's checkbox on page 1, in PDF points.
    pub fn checkbox_y(self) -> f32 {
        match self {
            Reason::Work => 578.0,
            Reason::Shopping => 533.0,
            Reason::Leisure => 358.0,
            Reason::Health => 477.0,
            Reason::Family => 435.0,
            Reason::Disability => 396.0,
            Reason::Summons => 295.0,
            Reason::ProfessionalMission => 255.0,
            Reason::Children => 211.0,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Reason {
    type Err = UnknownReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reason::ALL
            .iter()
            .copied()
            .find(|reason| reason.code() == s)
            .ok_or_else(|| UnknownReason(s.to_string()))
    }
}

/// Rejection of a reason code outside the closed set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown travel reason code {0:?}")]
pub struct UnknownReason(pub String);
