//! Country → continent lookup.
//!
//! Geocoding providers never return a continent component, so the top of the
//! hierarchy is derived from the country's long name. Keys are the canonical
//! English names the provider returns, matched case-sensitively.

pub const AFRICA: &str = "Africa";
pub const ANTARCTICA: &str = "Antarctica";
pub const ASIA: &str = "Asia";
pub const EUROPE: &str = "Europe";
pub const NORTH_AMERICA: &str = "North America";
pub const OCEANIA: &str = "Oceania";
pub const SOUTH_AMERICA: &str = "South America";

/// Continent for a country name, `None` when the name is not recognized
pub fn continent_for(country: &str) -> Option<&'static str> {
    let continent = match country {
        // Africa
        "Algeria" | "Angola" | "Benin" | "Botswana" | "Burkina Faso" | "Burundi"
        | "Cameroon" | "Cape Verde" | "Cabo Verde" | "Central African Republic" | "Chad"
        | "Comoros" | "Congo" | "Republic of the Congo" | "Democratic Republic of the Congo"
        | "Congo (DRC)" | "Côte d'Ivoire" | "Ivory Coast" | "Djibouti" | "Egypt"
        | "Equatorial Guinea" | "Eritrea" | "Eswatini" | "Swaziland" | "Ethiopia" | "Gabon"
        | "Gambia" | "The Gambia" | "Ghana" | "Guinea" | "Guinea-Bissau" | "Kenya"
        | "Lesotho" | "Liberia" | "Libya" | "Madagascar" | "Malawi" | "Mali" | "Mauritania"
        | "Mauritius" | "Mayotte" | "Morocco" | "Mozambique" | "Namibia" | "Niger"
        | "Nigeria" | "Réunion" | "Rwanda" | "Saint Helena" | "São Tomé and Príncipe"
        | "Sao Tome and Principe" | "Senegal" | "Seychelles" | "Sierra Leone" | "Somalia"
        | "South Africa" | "South Sudan" | "Sudan" | "Tanzania" | "Togo" | "Tunisia"
        | "Uganda" | "Western Sahara" | "Zambia" | "Zimbabwe" => AFRICA,

        // Antarctica
        "Antarctica" | "Bouvet Island" | "French Southern and Antarctic Lands"
        | "French Southern Territories" | "Heard Island and McDonald Islands"
        | "South Georgia and the South Sandwich Islands" => ANTARCTICA,

        // Asia
        "Afghanistan" | "Armenia" | "Azerbaijan" | "Bahrain" | "Bangladesh" | "Bhutan"
        | "British Indian Ocean Territory" | "Brunei" | "Cambodia" | "China" | "Georgia"
        | "Hong Kong" | "India" | "Indonesia" | "Iran" | "Iraq" | "Israel" | "Japan"
        | "Jordan" | "Kazakhstan" | "Kuwait" | "Kyrgyzstan" | "Laos" | "Lebanon" | "Macao"
        | "Macau" | "Malaysia" | "Maldives" | "Mongolia" | "Myanmar (Burma)" | "Myanmar"
        | "Nepal" | "North Korea" | "Oman" | "Pakistan" | "Palestine"
        | "Palestinian Territories" | "Philippines" | "Qatar" | "Saudi Arabia"
        | "Singapore" | "South Korea" | "Sri Lanka" | "Syria" | "Taiwan" | "Tajikistan"
        | "Thailand" | "Timor-Leste" | "East Timor" | "Turkey" | "Türkiye"
        | "Turkmenistan" | "United Arab Emirates" | "Uzbekistan" | "Vietnam" | "Yemen" => ASIA,

        // Europe
        "Åland Islands" | "Albania" | "Andorra" | "Austria" | "Belarus" | "Belgium"
        | "Bosnia and Herzegovina" | "Bulgaria" | "Croatia" | "Cyprus" | "Czechia"
        | "Czech Republic" | "Denmark" | "Estonia" | "Faroe Islands" | "Finland" | "France"
        | "Germany" | "Gibraltar" | "Greece" | "Guernsey" | "Hungary" | "Iceland"
        | "Ireland" | "Isle of Man" | "Italy" | "Jersey" | "Kosovo" | "Latvia"
        | "Liechtenstein" | "Lithuania" | "Luxembourg" | "Malta" | "Moldova" | "Monaco"
        | "Montenegro" | "Netherlands" | "North Macedonia" | "Macedonia (FYROM)" | "Norway"
        | "Poland" | "Portugal" | "Romania" | "Russia" | "San Marino" | "Serbia"
        | "Slovakia" | "Slovenia" | "Spain" | "Svalbard and Jan Mayen" | "Sweden"
        | "Switzerland" | "Ukraine" | "United Kingdom" | "Vatican City" => EUROPE,

        // North America
        "Anguilla" | "Antigua and Barbuda" | "Aruba" | "Bahamas" | "The Bahamas"
        | "Barbados" | "Belize" | "Bermuda" | "Bonaire" | "Caribbean Netherlands"
        | "British Virgin Islands" | "Canada" | "Cayman Islands" | "Costa Rica" | "Cuba"
        | "Curaçao" | "Dominica" | "Dominican Republic" | "El Salvador" | "Greenland"
        | "Grenada" | "Guadeloupe" | "Guatemala" | "Haiti" | "Honduras" | "Jamaica"
        | "Martinique" | "Mexico" | "Montserrat" | "Nicaragua" | "Panama" | "Puerto Rico"
        | "Saint Barthélemy" | "St Kitts and Nevis" | "Saint Kitts and Nevis"
        | "St Lucia" | "Saint Lucia" | "Saint Martin" | "Sint Maarten"
        | "St Pierre and Miquelon" | "Saint Pierre and Miquelon"
        | "St Vincent and the Grenadines" | "Saint Vincent and the Grenadines"
        | "Trinidad and Tobago" | "Turks and Caicos Islands" | "United States"
        | "U.S. Virgin Islands" => NORTH_AMERICA,

        // Oceania
        "American Samoa" | "Australia" | "Christmas Island" | "Cocos (Keeling) Islands"
        | "Cook Islands" | "Fiji" | "French Polynesia" | "Guam" | "Kiribati"
        | "Marshall Islands" | "Micronesia" | "Nauru" | "New Caledonia" | "New Zealand"
        | "Niue" | "Norfolk Island" | "Northern Mariana Islands" | "Palau"
        | "Papua New Guinea" | "Pitcairn Islands" | "Samoa" | "Solomon Islands" | "Tokelau"
        | "Tonga" | "Tuvalu" | "Vanuatu" | "Wallis and Futuna" => OCEANIA,

        // South America
        "Argentina" | "Bolivia" | "Brazil" | "Chile" | "Colombia" | "Ecuador"
        | "Falkland Islands (Islas Malvinas)" | "Falkland Islands" | "French Guiana"
        | "Guyana" | "Paraguay" | "Peru" | "Suriname" | "Uruguay" | "Venezuela" => {
            SOUTH_AMERICA
        }

        _ => return None,
    };
    Some(continent)
}
