//! Static country and indicator registry.
//!
//! Display names map to ISO 3166-1 **alpha-3** codes, which is what the World
//! Bank API accepts in the `country/{code}` path segment. Lookups are exact
//! (after trimming) and fail on names outside the list; there is no default
//! country.

use crate::error::RegistryError;
use ahash::AHashMap;
use std::fmt;
use std::sync::LazyLock;

/// Continent grouping used to organise selection widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Africa,
    NorthAmerica,
    SouthAmerica,
    Europe,
    Asia,
    Oceania,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Africa,
        Region::NorthAmerica,
        Region::SouthAmerica,
        Region::Europe,
        Region::Asia,
        Region::Oceania,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::NorthAmerica => "North America",
            Region::SouthAmerica => "South America",
            Region::Europe => "Europe",
            Region::Asia => "Asia",
            Region::Oceania => "Oceania",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub name: &'static str,
    pub code: &'static str,
    pub region: Region,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub label: &'static str,
    pub code: &'static str,
}

const fn entry(name: &'static str, code: &'static str, region: Region) -> Country {
    Country { name, code, region }
}

const fn metric(label: &'static str, code: &'static str) -> Indicator {
    Indicator { label, code }
}

use Region::*;

static COUNTRIES: [Country; 49] = [
    entry("South Africa", "ZAF", Africa),
    entry("Nigeria", "NGA", Africa),
    entry("Kenya", "KEN", Africa),
    entry("Egypt", "EGY", Africa),
    entry("Ghana", "GHA", Africa),
    entry("Ethiopia", "ETH", Africa),
    entry("Tanzania", "TZA", Africa),
    entry("Uganda", "UGA", Africa),
    entry("Morocco", "MAR", Africa),
    entry("Algeria", "DZA", Africa),
    entry("Zimbabwe", "ZWE", Africa),
    entry("Zambia", "ZMB", Africa),
    entry("Botswana", "BWA", Africa),
    entry("Namibia", "NAM", Africa),
    entry("Mozambique", "MOZ", Africa),
    entry("Angola", "AGO", Africa),
    entry("Senegal", "SEN", Africa),
    entry("Ivory Coast", "CIV", Africa),
    entry("Cameroon", "CMR", Africa),
    entry("United States", "USA", NorthAmerica),
    entry("Canada", "CAN", NorthAmerica),
    entry("Mexico", "MEX", NorthAmerica),
    entry("Brazil", "BRA", SouthAmerica),
    entry("Argentina", "ARG", SouthAmerica),
    entry("Chile", "CHL", SouthAmerica),
    entry("Colombia", "COL", SouthAmerica),
    entry("Peru", "PER", SouthAmerica),
    entry("United Kingdom", "GBR", Europe),
    entry("Germany", "DEU", Europe),
    entry("France", "FRA", Europe),
    entry("Italy", "ITA", Europe),
    entry("Spain", "ESP", Europe),
    entry("Netherlands", "NLD", Europe),
    entry("Sweden", "SWE", Europe),
    entry("Norway", "NOR", Europe),
    entry("Switzerland", "CHE", Europe),
    entry("Russia", "RUS", Europe),
    entry("China", "CHN", Asia),
    entry("India", "IND", Asia),
    entry("Japan", "JPN", Asia),
    entry("South Korea", "KOR", Asia),
    entry("Indonesia", "IDN", Asia),
    entry("Saudi Arabia", "SAU", Asia),
    entry("Turkey", "TUR", Asia),
    entry("United Arab Emirates", "ARE", Asia),
    entry("Pakistan", "PAK", Asia),
    entry("Bangladesh", "BGD", Asia),
    entry("Australia", "AUS", Oceania),
    entry("New Zealand", "NZL", Oceania),
];

static INDICATORS: [Indicator; 18] = [
    metric("GDP (current US$)", "NY.GDP.MKTP.CD"),
    metric("GDP growth (%)", "NY.GDP.MKTP.KD.ZG"),
    metric("GDP per capita (US$)", "NY.GDP.PCAP.CD"),
    metric("Inflation (%)", "FP.CPI.TOTL.ZG"),
    metric("Unemployment (%)", "SL.UEM.TOTL.ZS"),
    metric("Youth Unemployment (%)", "SL.UEM.1524.ZS"),
    metric("Population, total", "SP.POP.TOTL"),
    metric("Life Expectancy (years)", "SP.DYN.LE00.IN"),
    metric("Health expenditure (% of GDP)", "SH.XPD.CHEX.GD.ZS"),
    metric("Education expenditure (% of GDP)", "SE.XPD.TOTL.GD.ZS"),
    metric("Foreign direct investment (% of GDP)", "BX.KLT.DINV.WD.GD.ZS"),
    metric("Exports (% of GDP)", "NE.EXP.GNFS.ZS"),
    metric("Imports (% of GDP)", "NE.IMP.GNFS.ZS"),
    metric("Internet users (% of population)", "IT.NET.USER.ZS"),
    metric("Mobile cellular subscriptions (per 100 people)", "IT.CEL.SETS.P2"),
    metric("Current account balance (% of GDP)", "BN.CAB.XOKA.GD.ZS"),
    metric("Government debt (% of GDP)", "GC.DOD.TOTL.GD.ZS"),
    metric("Poverty headcount ratio ($2.15/day)", "SI.POV.DDAY"),
];

static BY_NAME: LazyLock<AHashMap<&'static str, &'static Country>> =
    LazyLock::new(|| COUNTRIES.iter().map(|c| (c.name, c)).collect());

static BY_CODE: LazyLock<AHashMap<&'static str, &'static Country>> =
    LazyLock::new(|| COUNTRIES.iter().map(|c| (c.code, c)).collect());

static BY_LABEL: LazyLock<AHashMap<&'static str, &'static Indicator>> =
    LazyLock::new(|| INDICATORS.iter().map(|i| (i.label, i)).collect());

/// All countries in display order (grouped by region).
pub fn countries() -> &'static [Country] {
    &COUNTRIES
}

pub fn countries_in(region: Region) -> impl Iterator<Item = &'static Country> {
    COUNTRIES.iter().filter(move |c| c.region == region)
}

/// All indicators in display order.
pub fn indicators() -> &'static [Indicator] {
    &INDICATORS
}

pub fn country(name: &str) -> Option<&'static Country> {
    BY_NAME.get(name.trim()).copied()
}

pub fn indicator(label: &str) -> Option<&'static Indicator> {
    BY_LABEL.get(label.trim()).copied()
}

/// Resolve a display name to its API country code.
pub fn country_code(name: &str) -> Result<&'static str, RegistryError> {
    country(name)
        .map(|c| c.code)
        .ok_or_else(|| RegistryError::UnknownCountry(name.to_string()))
}

/// Resolve an indicator label to its API indicator id.
pub fn indicator_code(label: &str) -> Result<&'static str, RegistryError> {
    indicator(label)
        .map(|i| i.code)
        .ok_or_else(|| RegistryError::UnknownIndicator(label.to_string()))
}

/// Reverse lookup: display name for an API country code (case-insensitive).
pub fn country_name(code: &str) -> Option<&'static str> {
    let code = code.trim().to_ascii_uppercase();
    BY_CODE.get(code.as_str()).map(|c| c.name)
}
