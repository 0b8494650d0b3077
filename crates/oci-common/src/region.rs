//! Region and realm metadata used to construct service endpoints.
//!
//! Every region belongs to a realm, and the realm decides the second-level
//! domain of service hostnames. Endpoints are produced from per-service
//! templates such as `https://iaas.{region}.{secondLevelDomain}`. Region
//! identifiers parse case-insensitively by canonical id or by airport-style
//! short code; identifiers this crate does not know yet resolve against the
//! commercial realm so new regions keep working without a client upgrade.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A deployment realm. Realms share no infrastructure with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Realm {
    /// Commercial realm
    Oc1,
    /// US Government Cloud realm
    Oc2,
    /// US Federal Government Cloud realm
    Oc3,
}

impl Realm {
    /// Realm identifier, e.g. `oc1`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Oc1 => "oc1",
            Self::Oc2 => "oc2",
            Self::Oc3 => "oc3",
        }
    }

    /// Second-level domain for service hostnames in this realm.
    #[must_use]
    pub const fn second_level_domain(self) -> &'static str {
        match self {
            Self::Oc1 => "oraclecloud.com",
            Self::Oc2 | Self::Oc3 => "oraclegovcloud.com",
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A region of the cloud platform.
///
/// Known regions carry their realm and short code. Regions introduced after
/// this crate was published can be used through [`Region::Custom`], which
/// [`Region::parse`] produces automatically for unrecognised identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Region {
    /// US West (Phoenix)
    UsPhoenix1,
    /// US East (Ashburn)
    UsAshburn1,
    /// US West (San Jose)
    UsSanjose1,
    /// Canada Southeast (Toronto)
    CaToronto1,
    /// Brazil East (Sao Paulo)
    SaSaopaulo1,
    /// UK South (London)
    UkLondon1,
    /// Germany Central (Frankfurt)
    EuFrankfurt1,
    /// Netherlands Northwest (Amsterdam)
    EuAmsterdam1,
    /// Switzerland North (Zurich)
    EuZurich1,
    /// Japan East (Tokyo)
    ApTokyo1,
    /// Japan Central (Osaka)
    ApOsaka1,
    /// South Korea Central (Seoul)
    ApSeoul1,
    /// India West (Mumbai)
    ApMumbai1,
    /// Australia East (Sydney)
    ApSydney1,
    /// US Gov East (Langley), oc2 realm
    UsLangley1,
    /// US Gov West (Luke), oc2 realm
    UsLuke1,
    /// US Federal Gov East (Ashburn), oc3 realm
    UsGovAshburn1,
    /// US Federal Gov Central (Chicago), oc3 realm
    UsGovChicago1,
    /// US Federal Gov West (Phoenix), oc3 realm
    UsGovPhoenix1,
    /// A region this crate has no metadata for, addressed by its raw
    /// identifier and resolved against the commercial realm
    Custom(String),
}

/// Regions with built-in metadata, in canonical-id order.
const KNOWN_REGIONS: &[Region] = &[
    Region::UsPhoenix1,
    Region::UsAshburn1,
    Region::UsSanjose1,
    Region::CaToronto1,
    Region::SaSaopaulo1,
    Region::UkLondon1,
    Region::EuFrankfurt1,
    Region::EuAmsterdam1,
    Region::EuZurich1,
    Region::ApTokyo1,
    Region::ApOsaka1,
    Region::ApSeoul1,
    Region::ApMumbai1,
    Region::ApSydney1,
    Region::UsLangley1,
    Region::UsLuke1,
    Region::UsGovAshburn1,
    Region::UsGovChicago1,
    Region::UsGovPhoenix1,
];

impl Region {
    /// All regions this crate ships metadata for.
    #[must_use]
    pub const fn known() -> &'static [Self] {
        KNOWN_REGIONS
    }

    /// Canonical region identifier, e.g. `us-phoenix-1`.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::UsPhoenix1 => "us-phoenix-1",
            Self::UsAshburn1 => "us-ashburn-1",
            Self::UsSanjose1 => "us-sanjose-1",
            Self::CaToronto1 => "ca-toronto-1",
            Self::SaSaopaulo1 => "sa-saopaulo-1",
            Self::UkLondon1 => "uk-london-1",
            Self::EuFrankfurt1 => "eu-frankfurt-1",
            Self::EuAmsterdam1 => "eu-amsterdam-1",
            Self::EuZurich1 => "eu-zurich-1",
            Self::ApTokyo1 => "ap-tokyo-1",
            Self::ApOsaka1 => "ap-osaka-1",
            Self::ApSeoul1 => "ap-seoul-1",
            Self::ApMumbai1 => "ap-mumbai-1",
            Self::ApSydney1 => "ap-sydney-1",
            Self::UsLangley1 => "us-langley-1",
            Self::UsLuke1 => "us-luke-1",
            Self::UsGovAshburn1 => "us-gov-ashburn-1",
            Self::UsGovChicago1 => "us-gov-chicago-1",
            Self::UsGovPhoenix1 => "us-gov-phoenix-1",
            Self::Custom(id) => id.as_str(),
        }
    }

    /// Airport-style short code, e.g. `phx`, when one is known.
    #[must_use]
    pub const fn short_code(&self) -> Option<&'static str> {
        match self {
            Self::UsPhoenix1 => Some("phx"),
            Self::UsAshburn1 => Some("iad"),
            Self::UsSanjose1 => Some("sjc"),
            Self::CaToronto1 => Some("yyz"),
            Self::SaSaopaulo1 => Some("gru"),
            Self::UkLondon1 => Some("lhr"),
            Self::EuFrankfurt1 => Some("fra"),
            Self::EuAmsterdam1 => Some("ams"),
            Self::EuZurich1 => Some("zrh"),
            Self::ApTokyo1 => Some("nrt"),
            Self::ApOsaka1 => Some("kix"),
            Self::ApSeoul1 => Some("icn"),
            Self::ApMumbai1 => Some("bom"),
            Self::ApSydney1 => Some("syd"),
            Self::UsLangley1 => Some("lfi"),
            Self::UsLuke1 => Some("luf"),
            Self::UsGovAshburn1 => Some("ric"),
            Self::UsGovChicago1 => Some("pia"),
            Self::UsGovPhoenix1 => Some("tus"),
            Self::Custom(_) => None,
        }
    }

    /// The realm this region belongs to. Custom regions are assumed
    /// commercial.
    #[must_use]
    pub const fn realm(&self) -> Realm {
        match self {
            Self::UsLangley1 | Self::UsLuke1 => Realm::Oc2,
            Self::UsGovAshburn1 | Self::UsGovChicago1 | Self::UsGovPhoenix1 => Realm::Oc3,
            _ => Realm::Oc1,
        }
    }

    /// Second-level domain for service hostnames in this region.
    #[must_use]
    pub const fn second_level_domain(&self) -> &'static str {
        self.realm().second_level_domain()
    }

    /// Parse a region from its canonical id or short code, case-insensitively.
    ///
    /// Unrecognised identifiers are lowercased and kept as
    /// [`Region::Custom`]; a warning is logged because the realm can only be
    /// guessed for them.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let normalised = value.trim().to_ascii_lowercase();
        for region in Self::known() {
            if region.id() == normalised || region.short_code() == Some(normalised.as_str()) {
                return region.clone();
            }
        }
        tracing::warn!(
            region = %normalised,
            "unrecognised region, resolving endpoints against the commercial realm"
        );
        Self::Custom(normalised)
    }

    /// Expand a service endpoint template for this region.
    ///
    /// Templates use `{region}` and `{secondLevelDomain}` placeholders. An
    /// empty template falls back to the conventional
    /// `https://{service}.{region}.{secondLevelDomain}` layout.
    #[must_use]
    pub fn endpoint_for_template(&self, service: &str, template: &str) -> String {
        if template.is_empty() {
            return format!(
                "https://{}.{}.{}",
                service,
                self.id(),
                self.second_level_domain()
            );
        }
        template
            .replace("{region}", self.id())
            .replace("{secondLevelDomain}", self.second_level_domain())
    }
}

impl From<&str> for Region {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl Serialize for Region {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_by_canonical_id() {
        assert_eq!(Region::parse("us-phoenix-1"), Region::UsPhoenix1);
        assert_eq!(Region::parse("EU-FRANKFURT-1"), Region::EuFrankfurt1);
    }

    #[test]
    fn parse_by_short_code() {
        assert_eq!(Region::parse("phx"), Region::UsPhoenix1);
        assert_eq!(Region::parse("IAD"), Region::UsAshburn1);
        assert_eq!(Region::parse("yyz"), Region::CaToronto1);
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(Region::parse(" us-ashburn-1 "), Region::UsAshburn1);
    }

    #[test]
    fn unknown_region_becomes_custom() {
        let region = Region::parse("EU-MILAN-1");
        assert_eq!(region, Region::Custom("eu-milan-1".to_string()));
        assert_eq!(region.id(), "eu-milan-1");
        assert_eq!(region.realm(), Realm::Oc1);
        assert!(region.short_code().is_none());
    }

    #[test]
    fn realm_domains() {
        assert_eq!(Region::UsPhoenix1.second_level_domain(), "oraclecloud.com");
        assert_eq!(Region::UsLangley1.realm(), Realm::Oc2);
        assert_eq!(Region::UsLangley1.second_level_domain(), "oraclegovcloud.com");
        assert_eq!(Region::UsGovChicago1.realm(), Realm::Oc3);
        assert_eq!(
            Region::UsGovChicago1.second_level_domain(),
            "oraclegovcloud.com"
        );
    }

    #[test]
    fn endpoint_template_expansion() {
        let endpoint = Region::UsPhoenix1
            .endpoint_for_template("iaas", "https://iaas.{region}.{secondLevelDomain}");
        assert_eq!(endpoint, "https://iaas.us-phoenix-1.oraclecloud.com");
    }

    #[test]
    fn endpoint_template_expansion_gov_realm() {
        let endpoint = Region::UsLuke1
            .endpoint_for_template("iaas", "https://iaas.{region}.{secondLevelDomain}");
        assert_eq!(endpoint, "https://iaas.us-luke-1.oraclegovcloud.com");
    }

    #[test]
    fn empty_template_uses_conventional_layout() {
        let endpoint = Region::ApTokyo1.endpoint_for_template("iaas", "");
        assert_eq!(endpoint, "https://iaas.ap-tokyo-1.oraclecloud.com");
    }

    #[test]
    fn serde_round_trip_uses_canonical_id() {
        let json = serde_json::to_string(&Region::EuZurich1).unwrap();
        assert_eq!(json, "\"eu-zurich-1\"");
        let region: Region = serde_json::from_str("\"ZRH\"").unwrap();
        assert_eq!(region, Region::EuZurich1);
    }

    #[test]
    fn every_known_region_has_distinct_id_and_code() {
        let mut ids = std::collections::HashSet::new();
        let mut codes = std::collections::HashSet::new();
        for region in Region::known() {
            assert!(ids.insert(region.id().to_string()));
            let code = region.short_code().unwrap();
            assert!(codes.insert(code));
        }
    }
}
