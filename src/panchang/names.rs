/// Closed label sets for panchang elements with Marathi/English names
use chrono::Weekday;
use serde::{Deserialize, Serialize, Serializer};

/// A label with a fixed Marathi and English rendering
pub trait Bilingual {
    fn marathi(&self) -> &'static str;
    fn english(&self) -> &'static str;
}

/// Serde adapter writing a label's Marathi rendering
pub fn marathi_label<S: Serializer, T: Bilingual>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.marathi())
}

/// Day of the week, Sunday first (the order used by the calendar grid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vaar {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Vaar {
    /// 0 = Sunday .. 6 = Saturday
    pub fn index(self) -> u32 {
        self as u32
    }
}

impl From<Weekday> for Vaar {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => Vaar::Sunday,
            Weekday::Mon => Vaar::Monday,
            Weekday::Tue => Vaar::Tuesday,
            Weekday::Wed => Vaar::Wednesday,
            Weekday::Thu => Vaar::Thursday,
            Weekday::Fri => Vaar::Friday,
            Weekday::Sat => Vaar::Saturday,
        }
    }
}

impl Bilingual for Vaar {
    fn marathi(&self) -> &'static str {
        match self {
            Vaar::Sunday => "रविवार",
            Vaar::Monday => "सोमवार",
            Vaar::Tuesday => "मंगळवार",
            Vaar::Wednesday => "बुधवार",
            Vaar::Thursday => "गुरुवार",
            Vaar::Friday => "शुक्रवार",
            Vaar::Saturday => "शनिवार",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Vaar::Sunday => "Sunday",
            Vaar::Monday => "Monday",
            Vaar::Tuesday => "Tuesday",
            Vaar::Wednesday => "Wednesday",
            Vaar::Thursday => "Thursday",
            Vaar::Friday => "Friday",
            Vaar::Saturday => "Saturday",
        }
    }
}

/// Lunar fortnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paksha {
    /// Waxing half, new moon to full moon
    Shukla,
    /// Waning half, full moon to new moon
    Krishna,
}

impl Paksha {
    /// Short prefix used in festival tithi descriptions ("शु. नवमी")
    pub fn abbreviation(self) -> &'static str {
        match self {
            Paksha::Shukla => "शु.",
            Paksha::Krishna => "कृ.",
        }
    }
}

impl Bilingual for Paksha {
    fn marathi(&self) -> &'static str {
        match self {
            Paksha::Shukla => "शुक्ल पक्ष",
            Paksha::Krishna => "कृष्ण पक्ष",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Paksha::Shukla => "Shukla Paksha",
            Paksha::Krishna => "Krishna Paksha",
        }
    }
}

/// Name of a tithi within its paksha; the 15th differs by paksha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TithiName {
    Pratipada,
    Dwitiya,
    Tritiya,
    Chaturthi,
    Panchami,
    Shashthi,
    Saptami,
    Ashtami,
    Navami,
    Dashami,
    Ekadashi,
    Dwadashi,
    Trayodashi,
    Chaturdashi,
    Purnima,
    Amavasya,
}

const TITHI_LABELS: [(&str, &str); 16] = [
    ("प्रतिपदा", "Pratipada"),
    ("द्वितीया", "Dwitiya"),
    ("तृतीया", "Tritiya"),
    ("चतुर्थी", "Chaturthi"),
    ("पंचमी", "Panchami"),
    ("षष्ठी", "Shashthi"),
    ("सप्तमी", "Saptami"),
    ("अष्टमी", "Ashtami"),
    ("नवमी", "Navami"),
    ("दशमी", "Dashami"),
    ("एकादशी", "Ekadashi"),
    ("द्वादशी", "Dwadashi"),
    ("त्रयोदशी", "Trayodashi"),
    ("चतुर्दशी", "Chaturdashi"),
    ("पौर्णिमा", "Purnima"),
    ("अमावस्या", "Amavasya"),
];

impl TithiName {
    const ORDERED: [TithiName; 14] = [
        TithiName::Pratipada,
        TithiName::Dwitiya,
        TithiName::Tritiya,
        TithiName::Chaturthi,
        TithiName::Panchami,
        TithiName::Shashthi,
        TithiName::Saptami,
        TithiName::Ashtami,
        TithiName::Navami,
        TithiName::Dashami,
        TithiName::Ekadashi,
        TithiName::Dwadashi,
        TithiName::Trayodashi,
        TithiName::Chaturdashi,
    ];

    /// Name for ordinal 1..=15 within a paksha
    pub fn from_ordinal(ordinal: u8, paksha: Paksha) -> Option<Self> {
        match (ordinal, paksha) {
            (15, Paksha::Shukla) => Some(TithiName::Purnima),
            (15, Paksha::Krishna) => Some(TithiName::Amavasya),
            (1..=14, _) => Some(Self::ORDERED[ordinal as usize - 1]),
            _ => None,
        }
    }
}

impl Bilingual for TithiName {
    fn marathi(&self) -> &'static str {
        TITHI_LABELS[*self as usize].0
    }

    fn english(&self) -> &'static str {
        TITHI_LABELS[*self as usize].1
    }
}

/// The 27 lunar mansions, Ashwini first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NakshatraName {
    Ashwini,
    Bharani,
    Krittika,
    Rohini,
    Mrigashira,
    Ardra,
    Punarvasu,
    Pushya,
    Ashlesha,
    Magha,
    PurvaPhalguni,
    UttaraPhalguni,
    Hasta,
    Chitra,
    Swati,
    Vishakha,
    Anuradha,
    Jyeshtha,
    Mula,
    PurvaAshadha,
    UttaraAshadha,
    Shravana,
    Dhanishtha,
    Shatabhisha,
    PurvaBhadrapada,
    UttaraBhadrapada,
    Revati,
}

impl NakshatraName {
    pub const ALL: [NakshatraName; 27] = [
        NakshatraName::Ashwini,
        NakshatraName::Bharani,
        NakshatraName::Krittika,
        NakshatraName::Rohini,
        NakshatraName::Mrigashira,
        NakshatraName::Ardra,
        NakshatraName::Punarvasu,
        NakshatraName::Pushya,
        NakshatraName::Ashlesha,
        NakshatraName::Magha,
        NakshatraName::PurvaPhalguni,
        NakshatraName::UttaraPhalguni,
        NakshatraName::Hasta,
        NakshatraName::Chitra,
        NakshatraName::Swati,
        NakshatraName::Vishakha,
        NakshatraName::Anuradha,
        NakshatraName::Jyeshtha,
        NakshatraName::Mula,
        NakshatraName::PurvaAshadha,
        NakshatraName::UttaraAshadha,
        NakshatraName::Shravana,
        NakshatraName::Dhanishtha,
        NakshatraName::Shatabhisha,
        NakshatraName::PurvaBhadrapada,
        NakshatraName::UttaraBhadrapada,
        NakshatraName::Revati,
    ];

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        (1..=27).contains(&ordinal).then(|| Self::ALL[ordinal as usize - 1])
    }

    pub fn ordinal(self) -> u8 {
        self as u8 + 1
    }
}

const NAKSHATRA_LABELS: [(&str, &str); 27] = [
    ("अश्विनी", "Ashwini"),
    ("भरणी", "Bharani"),
    ("कृत्तिका", "Krittika"),
    ("रोहिणी", "Rohini"),
    ("मृगशिरा", "Mrigashira"),
    ("आर्द्रा", "Ardra"),
    ("पुनर्वसु", "Punarvasu"),
    ("पुष्य", "Pushya"),
    ("आश्लेषा", "Ashlesha"),
    ("मघा", "Magha"),
    ("पूर्वा फाल्गुनी", "Purva Phalguni"),
    ("उत्तरा फाल्गुनी", "Uttara Phalguni"),
    ("हस्त", "Hasta"),
    ("चित्रा", "Chitra"),
    ("स्वाती", "Swati"),
    ("विशाखा", "Vishakha"),
    ("अनुराधा", "Anuradha"),
    ("ज्येष्ठा", "Jyeshtha"),
    ("मूळ", "Mula"),
    ("पूर्वाषाढा", "Purva Ashadha"),
    ("उत्तराषाढा", "Uttara Ashadha"),
    ("श्रवण", "Shravana"),
    ("धनिष्ठा", "Dhanishtha"),
    ("शततारका", "Shatabhisha"),
    ("पूर्वाभाद्रपदा", "Purva Bhadrapada"),
    ("उत्तराभाद्रपदा", "Uttara Bhadrapada"),
    ("रेवती", "Revati"),
];

impl Bilingual for NakshatraName {
    fn marathi(&self) -> &'static str {
        NAKSHATRA_LABELS[*self as usize].0
    }

    fn english(&self) -> &'static str {
        NAKSHATRA_LABELS[*self as usize].1
    }
}

/// The 27 luni-solar yogas, Vishkambha first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YogaName {
    Vishkambha,
    Priti,
    Ayushman,
    Saubhagya,
    Shobhana,
    Atiganda,
    Sukarma,
    Dhriti,
    Shula,
    Ganda,
    Vriddhi,
    Dhruva,
    Vyaghata,
    Harshana,
    Vajra,
    Siddhi,
    Vyatipata,
    Variyan,
    Parigha,
    Shiva,
    Siddha,
    Sadhya,
    Shubha,
    Shukla,
    Brahma,
    Indra,
    Vaidhriti,
}

impl YogaName {
    pub const ALL: [YogaName; 27] = [
        YogaName::Vishkambha,
        YogaName::Priti,
        YogaName::Ayushman,
        YogaName::Saubhagya,
        YogaName::Shobhana,
        YogaName::Atiganda,
        YogaName::Sukarma,
        YogaName::Dhriti,
        YogaName::Shula,
        YogaName::Ganda,
        YogaName::Vriddhi,
        YogaName::Dhruva,
        YogaName::Vyaghata,
        YogaName::Harshana,
        YogaName::Vajra,
        YogaName::Siddhi,
        YogaName::Vyatipata,
        YogaName::Variyan,
        YogaName::Parigha,
        YogaName::Shiva,
        YogaName::Siddha,
        YogaName::Sadhya,
        YogaName::Shubha,
        YogaName::Shukla,
        YogaName::Brahma,
        YogaName::Indra,
        YogaName::Vaidhriti,
    ];

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        (1..=27).contains(&ordinal).then(|| Self::ALL[ordinal as usize - 1])
    }
}

const YOGA_LABELS: [(&str, &str); 27] = [
    ("विष्कुम्भ", "Vishkambha"),
    ("प्रीति", "Priti"),
    ("आयुष्मान", "Ayushman"),
    ("सौभाग्य", "Saubhagya"),
    ("शोभन", "Shobhana"),
    ("अतिगण्ड", "Atiganda"),
    ("सुकर्मा", "Sukarma"),
    ("धृति", "Dhriti"),
    ("शूल", "Shula"),
    ("गण्ड", "Ganda"),
    ("वृद्धि", "Vriddhi"),
    ("ध्रुव", "Dhruva"),
    ("व्याघात", "Vyaghata"),
    ("हर्षण", "Harshana"),
    ("वज्र", "Vajra"),
    ("सिद्धि", "Siddhi"),
    ("व्यतिपात", "Vyatipata"),
    ("वरीयान", "Variyan"),
    ("परिघ", "Parigha"),
    ("शिव", "Shiva"),
    ("सिद्ध", "Siddha"),
    ("साध्य", "Sadhya"),
    ("शुभ", "Shubha"),
    ("शुक्ल", "Shukla"),
    ("ब्रह्म", "Brahma"),
    ("ऐन्द्र", "Indra"),
    ("वैधृति", "Vaidhriti"),
];

impl Bilingual for YogaName {
    fn marathi(&self) -> &'static str {
        YOGA_LABELS[*self as usize].0
    }

    fn english(&self) -> &'static str {
        YOGA_LABELS[*self as usize].1
    }
}

/// Half-tithi names: seven movable karanas and four fixed ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KaranaName {
    Bava,
    Balava,
    Kaulava,
    Taitila,
    Gara,
    Vanija,
    Vishti,
    Shakuni,
    Chatushpada,
    Naga,
    Kimstughna,
}

impl KaranaName {
    const MOVABLE: [KaranaName; 7] = [
        KaranaName::Bava,
        KaranaName::Balava,
        KaranaName::Kaulava,
        KaranaName::Taitila,
        KaranaName::Gara,
        KaranaName::Vanija,
        KaranaName::Vishti,
    ];

    /// Karana for a half-tithi index 0..60 counted from the new moon.
    ///
    /// Index 0 is Kimstughna, 1..=56 cycle through the movable seven,
    /// 57..=59 are Shakuni, Chatushpada and Naga.
    pub fn from_half_tithi(index: u8) -> Option<Self> {
        match index {
            0 => Some(KaranaName::Kimstughna),
            1..=56 => Some(Self::MOVABLE[(index as usize - 1) % 7]),
            57 => Some(KaranaName::Shakuni),
            58 => Some(KaranaName::Chatushpada),
            59 => Some(KaranaName::Naga),
            _ => None,
        }
    }
}

impl Bilingual for KaranaName {
    fn marathi(&self) -> &'static str {
        match self {
            KaranaName::Bava => "बव",
            KaranaName::Balava => "बालव",
            KaranaName::Kaulava => "कौलव",
            KaranaName::Taitila => "तैतिल",
            KaranaName::Gara => "गर",
            KaranaName::Vanija => "वणिज",
            KaranaName::Vishti => "विष्टि",
            KaranaName::Shakuni => "शकुनि",
            KaranaName::Chatushpada => "चतुष्पाद",
            KaranaName::Naga => "नाग",
            KaranaName::Kimstughna => "किंस्तुघ्न",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            KaranaName::Bava => "Bava",
            KaranaName::Balava => "Balava",
            KaranaName::Kaulava => "Kaulava",
            KaranaName::Taitila => "Taitila",
            KaranaName::Gara => "Gara",
            KaranaName::Vanija => "Vanija",
            KaranaName::Vishti => "Vishti",
            KaranaName::Shakuni => "Shakuni",
            KaranaName::Chatushpada => "Chatushpada",
            KaranaName::Naga => "Naga",
            KaranaName::Kimstughna => "Kimstughna",
        }
    }
}

/// Lunar month of the amanta calendar, Chaitra first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Masa {
    Chaitra,
    Vaishakha,
    Jyeshtha,
    Ashadha,
    Shravana,
    Bhadrapada,
    Ashvin,
    Kartika,
    Margashirsha,
    Pausha,
    Magha,
    Phalguna,
}

impl Masa {
    pub const ALL: [Masa; 12] = [
        Masa::Chaitra,
        Masa::Vaishakha,
        Masa::Jyeshtha,
        Masa::Ashadha,
        Masa::Shravana,
        Masa::Bhadrapada,
        Masa::Ashvin,
        Masa::Kartika,
        Masa::Margashirsha,
        Masa::Pausha,
        Masa::Magha,
        Masa::Phalguna,
    ];

    /// Month whose span contains the sun's ingress into `rashi`
    pub fn from_rashi(rashi: Rashi) -> Self {
        Self::ALL[rashi as usize]
    }

    /// 0 = Chaitra .. 11 = Phalguna
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl Bilingual for Masa {
    fn marathi(&self) -> &'static str {
        match self {
            Masa::Chaitra => "चैत्र",
            Masa::Vaishakha => "वैशाख",
            Masa::Jyeshtha => "ज्येष्ठ",
            Masa::Ashadha => "आषाढ",
            Masa::Shravana => "श्रावण",
            Masa::Bhadrapada => "भाद्रपद",
            Masa::Ashvin => "आश्विन",
            Masa::Kartika => "कार्तिक",
            Masa::Margashirsha => "मार्गशीर्ष",
            Masa::Pausha => "पौष",
            Masa::Magha => "माघ",
            Masa::Phalguna => "फाल्गुन",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Masa::Chaitra => "Chaitra",
            Masa::Vaishakha => "Vaishakha",
            Masa::Jyeshtha => "Jyeshtha",
            Masa::Ashadha => "Ashadha",
            Masa::Shravana => "Shravana",
            Masa::Bhadrapada => "Bhadrapada",
            Masa::Ashvin => "Ashvin",
            Masa::Kartika => "Kartika",
            Masa::Margashirsha => "Margashirsha",
            Masa::Pausha => "Pausha",
            Masa::Magha => "Magha",
            Masa::Phalguna => "Phalguna",
        }
    }
}

/// Sidereal zodiac sign, Mesha first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rashi {
    Mesha,
    Vrishabha,
    Mithuna,
    Karka,
    Simha,
    Kanya,
    Tula,
    Vrishchika,
    Dhanu,
    Makara,
    Kumbha,
    Meena,
}

impl Rashi {
    pub const ALL: [Rashi; 12] = [
        Rashi::Mesha,
        Rashi::Vrishabha,
        Rashi::Mithuna,
        Rashi::Karka,
        Rashi::Simha,
        Rashi::Kanya,
        Rashi::Tula,
        Rashi::Vrishchika,
        Rashi::Dhanu,
        Rashi::Makara,
        Rashi::Kumbha,
        Rashi::Meena,
    ];

    /// Sign containing a sidereal longitude in degrees
    pub fn from_longitude(sidereal_deg: f64) -> Self {
        let index = (sidereal_deg.rem_euclid(360.0) / 30.0).floor() as usize;
        Self::ALL[index.min(11)]
    }

    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % 12]
    }
}

impl Bilingual for Rashi {
    fn marathi(&self) -> &'static str {
        match self {
            Rashi::Mesha => "मेष",
            Rashi::Vrishabha => "वृषभ",
            Rashi::Mithuna => "मिथुन",
            Rashi::Karka => "कर्क",
            Rashi::Simha => "सिंह",
            Rashi::Kanya => "कन्या",
            Rashi::Tula => "तूळ",
            Rashi::Vrishchika => "वृश्चिक",
            Rashi::Dhanu => "धनु",
            Rashi::Makara => "मकर",
            Rashi::Kumbha => "कुंभ",
            Rashi::Meena => "मीन",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Rashi::Mesha => "Mesha",
            Rashi::Vrishabha => "Vrishabha",
            Rashi::Mithuna => "Mithuna",
            Rashi::Karka => "Karka",
            Rashi::Simha => "Simha",
            Rashi::Kanya => "Kanya",
            Rashi::Tula => "Tula",
            Rashi::Vrishchika => "Vrishchika",
            Rashi::Dhanu => "Dhanu",
            Rashi::Makara => "Makara",
            Rashi::Kumbha => "Kumbha",
            Rashi::Meena => "Meena",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifteenth_tithi_depends_on_paksha() {
        assert_eq!(TithiName::from_ordinal(15, Paksha::Shukla), Some(TithiName::Purnima));
        assert_eq!(TithiName::from_ordinal(15, Paksha::Krishna), Some(TithiName::Amavasya));
        assert_eq!(TithiName::from_ordinal(11, Paksha::Krishna), Some(TithiName::Ekadashi));
        assert_eq!(TithiName::from_ordinal(0, Paksha::Shukla), None);
        assert_eq!(TithiName::from_ordinal(16, Paksha::Shukla), None);
    }

    #[test]
    fn test_karana_cycle() {
        assert_eq!(KaranaName::from_half_tithi(0), Some(KaranaName::Kimstughna));
        assert_eq!(KaranaName::from_half_tithi(1), Some(KaranaName::Bava));
        assert_eq!(KaranaName::from_half_tithi(7), Some(KaranaName::Vishti));
        assert_eq!(KaranaName::from_half_tithi(8), Some(KaranaName::Bava));
        assert_eq!(KaranaName::from_half_tithi(56), Some(KaranaName::Vishti));
        assert_eq!(KaranaName::from_half_tithi(59), Some(KaranaName::Naga));
        assert_eq!(KaranaName::from_half_tithi(60), None);
    }

    #[test]
    fn test_nakshatra_ordinals() {
        assert_eq!(NakshatraName::from_ordinal(1), Some(NakshatraName::Ashwini));
        assert_eq!(NakshatraName::from_ordinal(27), Some(NakshatraName::Revati));
        assert_eq!(NakshatraName::from_ordinal(28), None);
        assert_eq!(NakshatraName::Revati.ordinal(), 27);
        assert_eq!(NakshatraName::Mula.marathi(), "मूळ");
    }

    #[test]
    fn test_masa_follows_rashi() {
        assert_eq!(Masa::from_rashi(Rashi::Mesha), Masa::Chaitra);
        assert_eq!(Masa::from_rashi(Rashi::Meena), Masa::Phalguna);
        assert_eq!(Rashi::Meena.next(), Rashi::Mesha);
        assert_eq!(Rashi::from_longitude(359.9), Rashi::Meena);
        assert_eq!(Rashi::from_longitude(270.0), Rashi::Makara);
    }

    #[test]
    fn test_unknown_masa_key_rejected() {
        let ok: Masa = serde_json::from_str("\"bhadrapada\"").unwrap();
        assert_eq!(ok, Masa::Bhadrapada);
        assert!(serde_json::from_str::<Masa>("\"adhik\"").is_err());
    }

    #[test]
    fn test_weekday_conversion() {
        assert_eq!(Vaar::from(Weekday::Sun).index(), 0);
        assert_eq!(Vaar::from(Weekday::Sat).index(), 6);
        assert_eq!(Vaar::Tuesday.marathi(), "मंगळवार");
    }
}
