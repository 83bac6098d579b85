//! English country names and their ISO 3166-1 alpha-2 codes.
//!
//! Common names first, then official names and aliases that show up in the
//! legacy free-text country field. Matching is case-insensitive.

pub(crate) const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("Afghanistan", "AF"),
    ("Åland Islands", "AX"),
    ("Albania", "AL"),
    ("Algeria", "DZ"),
    ("American Samoa", "AS"),
    ("Andorra", "AD"),
    ("Angola", "AO"),
    ("Anguilla", "AI"),
    ("Antarctica", "AQ"),
    ("Antigua and Barbuda", "AG"),
    ("Argentina", "AR"),
    ("Armenia", "AM"),
    ("Aruba", "AW"),
    ("Australia", "AU"),
    ("Austria", "AT"),
    ("Azerbaijan", "AZ"),
    ("Bahamas", "BS"),
    ("Bahrain", "BH"),
    ("Bangladesh", "BD"),
    ("Barbados", "BB"),
    ("Belarus", "BY"),
    ("Belgium", "BE"),
    ("Belize", "BZ"),
    ("Benin", "BJ"),
    ("Bermuda", "BM"),
    ("Bhutan", "BT"),
    ("Bolivia", "BO"),
    ("Caribbean Netherlands", "BQ"),
    ("Bosnia and Herzegovina", "BA"),
    ("Botswana", "BW"),
    ("Bouvet Island", "BV"),
    ("Brazil", "BR"),
    ("British Indian Ocean Territory", "IO"),
    ("British Virgin Islands", "VG"),
    ("Brunei", "BN"),
    ("Bulgaria", "BG"),
    ("Burkina Faso", "BF"),
    ("Burundi", "BI"),
    ("Cambodia", "KH"),
    ("Cameroon", "CM"),
    ("Canada", "CA"),
    ("Cape Verde", "CV"),
    ("Cayman Islands", "KY"),
    ("Central African Republic", "CF"),
    ("Chad", "TD"),
    ("Chile", "CL"),
    ("China", "CN"),
    ("Christmas Island", "CX"),
    ("Cocos (Keeling) Islands", "CC"),
    ("Colombia", "CO"),
    ("Comoros", "KM"),
    ("Republic of the Congo", "CG"),
    ("DR Congo", "CD"),
    ("Cook Islands", "CK"),
    ("Costa Rica", "CR"),
    ("Ivory Coast", "CI"),
    ("Croatia", "HR"),
    ("Cuba", "CU"),
    ("Curaçao", "CW"),
    ("Cyprus", "CY"),
    ("Czechia", "CZ"),
    ("Denmark", "DK"),
    ("Djibouti", "DJ"),
    ("Dominica", "DM"),
    ("Dominican Republic", "DO"),
    ("Ecuador", "EC"),
    ("Egypt", "EG"),
    ("El Salvador", "SV"),
    ("Equatorial Guinea", "GQ"),
    ("Eritrea", "ER"),
    ("Estonia", "EE"),
    ("Eswatini", "SZ"),
    ("Ethiopia", "ET"),
    ("Falkland Islands", "FK"),
    ("Faroe Islands", "FO"),
    ("Fiji", "FJ"),
    ("Finland", "FI"),
    ("France", "FR"),
    ("French Guiana", "GF"),
    ("French Polynesia", "PF"),
    ("French Southern and Antarctic Lands", "TF"),
    ("Gabon", "GA"),
    ("Gambia", "GM"),
    ("Georgia", "GE"),
    ("Germany", "DE"),
    ("Ghana", "GH"),
    ("Gibraltar", "GI"),
    ("Greece", "GR"),
    ("Greenland", "GL"),
    ("Grenada", "GD"),
    ("Guadeloupe", "GP"),
    ("Guam", "GU"),
    ("Guatemala", "GT"),
    ("Guernsey", "GG"),
    ("Guinea", "GN"),
    ("Guinea-Bissau", "GW"),
    ("Guyana", "GY"),
    ("Haiti", "HT"),
    ("Heard Island and McDonald Islands", "HM"),
    ("Vatican City", "VA"),
    ("Honduras", "HN"),
    ("Hong Kong", "HK"),
    ("Hungary", "HU"),
    ("Iceland", "IS"),
    ("India", "IN"),
    ("Indonesia", "ID"),
    ("Iran", "IR"),
    ("Iraq", "IQ"),
    ("Ireland", "IE"),
    ("Isle of Man", "IM"),
    ("Israel", "IL"),
    ("Italy", "IT"),
    ("Jamaica", "JM"),
    ("Japan", "JP"),
    ("Jersey", "JE"),
    ("Jordan", "JO"),
    ("Kazakhstan", "KZ"),
    ("Kenya", "KE"),
    ("Kiribati", "KI"),
    ("North Korea", "KP"),
    ("South Korea", "KR"),
    ("Kosovo", "XK"),
    ("Kuwait", "KW"),
    ("Kyrgyzstan", "KG"),
    ("Laos", "LA"),
    ("Latvia", "LV"),
    ("Lebanon", "LB"),
    ("Lesotho", "LS"),
    ("Liberia", "LR"),
    ("Libya", "LY"),
    ("Liechtenstein", "LI"),
    ("Lithuania", "LT"),
    ("Luxembourg", "LU"),
    ("Macau", "MO"),
    ("North Macedonia", "MK"),
    ("Madagascar", "MG"),
    ("Malawi", "MW"),
    ("Malaysia", "MY"),
    ("Maldives", "MV"),
    ("Mali", "ML"),
    ("Malta", "MT"),
    ("Marshall Islands", "MH"),
    ("Martinique", "MQ"),
    ("Mauritania", "MR"),
    ("Mauritius", "MU"),
    ("Mayotte", "YT"),
    ("Mexico", "MX"),
    ("Micronesia", "FM"),
    ("Moldova", "MD"),
    ("Monaco", "MC"),
    ("Mongolia", "MN"),
    ("Montenegro", "ME"),
    ("Montserrat", "MS"),
    ("Morocco", "MA"),
    ("Mozambique", "MZ"),
    ("Myanmar", "MM"),
    ("Namibia", "NA"),
    ("Nauru", "NR"),
    ("Nepal", "NP"),
    ("Netherlands", "NL"),
    ("New Caledonia", "NC"),
    ("New Zealand", "NZ"),
    ("Nicaragua", "NI"),
    ("Niger", "NE"),
    ("Nigeria", "NG"),
    ("Niue", "NU"),
    ("Norfolk Island", "NF"),
    ("Northern Mariana Islands", "MP"),
    ("Norway", "NO"),
    ("Oman", "OM"),
    ("Pakistan", "PK"),
    ("Palau", "PW"),
    ("Palestine", "PS"),
    ("Panama", "PA"),
    ("Papua New Guinea", "PG"),
    ("Paraguay", "PY"),
    ("Peru", "PE"),
    ("Philippines", "PH"),
    ("Pitcairn Islands", "PN"),
    ("Poland", "PL"),
    ("Portugal", "PT"),
    ("Puerto Rico", "PR"),
    ("Qatar", "QA"),
    ("Réunion", "RE"),
    ("Romania", "RO"),
    ("Russia", "RU"),
    ("Rwanda", "RW"),
    ("Saint Barthélemy", "BL"),
    ("Saint Helena, Ascension and Tristan da Cunha", "SH"),
    ("Saint Kitts and Nevis", "KN"),
    ("Saint Lucia", "LC"),
    ("Saint Martin", "MF"),
    ("Saint Pierre and Miquelon", "PM"),
    ("Saint Vincent and the Grenadines", "VC"),
    ("Samoa", "WS"),
    ("San Marino", "SM"),
    ("São Tomé and Príncipe", "ST"),
    ("Saudi Arabia", "SA"),
    ("Senegal", "SN"),
    ("Serbia", "RS"),
    ("Seychelles", "SC"),
    ("Sierra Leone", "SL"),
    ("Singapore", "SG"),
    ("Sint Maarten", "SX"),
    ("Slovakia", "SK"),
    ("Slovenia", "SI"),
    ("Solomon Islands", "SB"),
    ("Somalia", "SO"),
    ("South Africa", "ZA"),
    ("South Georgia", "GS"),
    ("South Sudan", "SS"),
    ("Spain", "ES"),
    ("Sri Lanka", "LK"),
    ("Sudan", "SD"),
    ("Suriname", "SR"),
    ("Svalbard and Jan Mayen", "SJ"),
    ("Sweden", "SE"),
    ("Switzerland", "CH"),
    ("Syria", "SY"),
    ("Taiwan", "TW"),
    ("Tajikistan", "TJ"),
    ("Tanzania", "TZ"),
    ("Thailand", "TH"),
    ("Timor-Leste", "TL"),
    ("Togo", "TG"),
    ("Tokelau", "TK"),
    ("Tonga", "TO"),
    ("Trinidad and Tobago", "TT"),
    ("Tunisia", "TN"),
    ("Turkey", "TR"),
    ("Turkmenistan", "TM"),
    ("Turks and Caicos Islands", "TC"),
    ("Tuvalu", "TV"),
    ("Uganda", "UG"),
    ("Ukraine", "UA"),
    ("United Arab Emirates", "AE"),
    ("United Kingdom", "GB"),
    ("United States", "US"),
    ("United States Minor Outlying Islands", "UM"),
    ("United States Virgin Islands", "VI"),
    ("Uruguay", "UY"),
    ("Uzbekistan", "UZ"),
    ("Vanuatu", "VU"),
    ("Venezuela", "VE"),
    ("Vietnam", "VN"),
    ("Wallis and Futuna", "WF"),
    ("Western Sahara", "EH"),
    ("Yemen", "YE"),
    ("Zambia", "ZM"),
    ("Zimbabwe", "ZW"),
    // Official names and aliases.
    ("Islamic Republic of Afghanistan", "AF"),
    ("People's Democratic Republic of Algeria", "DZ"),
    ("Argentine Republic", "AR"),
    ("Commonwealth of Australia", "AU"),
    ("Republic of Austria", "AT"),
    ("Commonwealth of the Bahamas", "BS"),
    ("The Bahamas", "BS"),
    ("Kingdom of Belgium", "BE"),
    ("Plurinational State of Bolivia", "BO"),
    ("Bonaire, Sint Eustatius and Saba", "BQ"),
    ("Federative Republic of Brazil", "BR"),
    ("Brunei Darussalam", "BN"),
    ("Cabo Verde", "CV"),
    ("Republic of Chile", "CL"),
    ("People's Republic of China", "CN"),
    ("Republic of Colombia", "CO"),
    ("Congo", "CG"),
    ("Congo-Brazzaville", "CG"),
    ("Democratic Republic of the Congo", "CD"),
    ("Congo-Kinshasa", "CD"),
    ("Côte d'Ivoire", "CI"),
    ("Cote d'Ivoire", "CI"),
    ("Republic of Croatia", "HR"),
    ("Republic of Cuba", "CU"),
    ("Curacao", "CW"),
    ("Republic of Cyprus", "CY"),
    ("Czech Republic", "CZ"),
    ("Kingdom of Denmark", "DK"),
    ("Arab Republic of Egypt", "EG"),
    ("Republic of Estonia", "EE"),
    ("Swaziland", "SZ"),
    ("Federal Democratic Republic of Ethiopia", "ET"),
    ("Falkland Islands (Malvinas)", "FK"),
    ("Faroes", "FO"),
    ("Republic of Finland", "FI"),
    ("French Republic", "FR"),
    ("French Southern Territories", "TF"),
    ("The Gambia", "GM"),
    ("Federal Republic of Germany", "DE"),
    ("Deutschland", "DE"),
    ("Hellenic Republic", "GR"),
    ("Holy See", "VA"),
    ("Vatican", "VA"),
    ("Hong Kong SAR", "HK"),
    ("Republic of Iceland", "IS"),
    ("Republic of India", "IN"),
    ("Republic of Indonesia", "ID"),
    ("Islamic Republic of Iran", "IR"),
    ("Republic of Iraq", "IQ"),
    ("Republic of Ireland", "IE"),
    ("Éire", "IE"),
    ("State of Israel", "IL"),
    ("Italian Republic", "IT"),
    ("Hashemite Kingdom of Jordan", "JO"),
    ("Republic of Kazakhstan", "KZ"),
    ("Republic of Kenya", "KE"),
    ("Democratic People's Republic of Korea", "KP"),
    ("Republic of Korea", "KR"),
    ("Korea", "KR"),
    ("Lao People's Democratic Republic", "LA"),
    ("Republic of Latvia", "LV"),
    ("Lebanese Republic", "LB"),
    ("State of Libya", "LY"),
    ("Republic of Lithuania", "LT"),
    ("Grand Duchy of Luxembourg", "LU"),
    ("Macao", "MO"),
    ("Macedonia", "MK"),
    ("Republic of North Macedonia", "MK"),
    ("Federated States of Micronesia", "FM"),
    ("Republic of Moldova", "MD"),
    ("United Mexican States", "MX"),
    ("Principality of Monaco", "MC"),
    ("Kingdom of Morocco", "MA"),
    ("Burma", "MM"),
    ("Kingdom of the Netherlands", "NL"),
    ("The Netherlands", "NL"),
    ("Holland", "NL"),
    ("Aotearoa", "NZ"),
    ("Federal Republic of Nigeria", "NG"),
    ("Kingdom of Norway", "NO"),
    ("Islamic Republic of Pakistan", "PK"),
    ("State of Palestine", "PS"),
    ("Palestine, State of", "PS"),
    ("Republic of Peru", "PE"),
    ("Republic of the Philippines", "PH"),
    ("Pitcairn", "PN"),
    ("Republic of Poland", "PL"),
    ("Portuguese Republic", "PT"),
    ("State of Qatar", "QA"),
    ("Reunion", "RE"),
    ("Russian Federation", "RU"),
    ("Saint Helena", "SH"),
    ("Saint Martin (French part)", "MF"),
    ("Sao Tome and Principe", "ST"),
    ("Kingdom of Saudi Arabia", "SA"),
    ("Republic of Serbia", "RS"),
    ("Republic of Singapore", "SG"),
    ("Sint Maarten (Dutch part)", "SX"),
    ("Slovak Republic", "SK"),
    ("Republic of Slovenia", "SI"),
    ("Republic of South Africa", "ZA"),
    ("South Georgia and the South Sandwich Islands", "GS"),
    ("Kingdom of Spain", "ES"),
    ("España", "ES"),
    ("Kingdom of Sweden", "SE"),
    ("Swiss Confederation", "CH"),
    ("Syrian Arab Republic", "SY"),
    ("Republic of China", "TW"),
    ("Taiwan, Province of China", "TW"),
    ("United Republic of Tanzania", "TZ"),
    ("Kingdom of Thailand", "TH"),
    ("East Timor", "TL"),
    ("Republic of Tunisia", "TN"),
    ("Türkiye", "TR"),
    ("Republic of Turkey", "TR"),
    ("UAE", "AE"),
    ("United Kingdom of Great Britain and Northern Ireland", "GB"),
    ("UK", "GB"),
    ("Great Britain", "GB"),
    ("England", "GB"),
    ("Scotland", "GB"),
    ("Wales", "GB"),
    ("Northern Ireland", "GB"),
    ("United States of America", "US"),
    ("USA", "US"),
    ("US", "US"),
    ("Virgin Islands, British", "VG"),
    ("Virgin Islands, U.S.", "VI"),
    ("Oriental Republic of Uruguay", "UY"),
    ("Bolivarian Republic of Venezuela", "VE"),
    ("Viet Nam", "VN"),
    ("Socialist Republic of Vietnam", "VN"),
    ("Republic of Yemen", "YE"),
];
