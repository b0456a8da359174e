//! Word lists shared by the query builder and the fallback extractor.
//!
//! Everything here is English-only and deliberately small; the lists are
//! tuned for consumer electronics listings.

/// Words that describe how a product is sold rather than what it is.
/// Matched against lowercased tokens.
pub const MARKETING_WORDS: &[&str] = &[
    // stop words
    "a", "an", "and", "the", "with", "for", "by", "from", "of", "on", "to", "in", "or", "your",
    "our", "all", "new", "latest", "newest", "best", "top", "premium", "official", "genuine",
    "original", "authentic", "upgraded", "improved", "release", "released", "edition",
    "version", "renewed", "refurbished", "bundle", "pack", "sale", "deal", "deals", "free",
    "shipping", "fast", "hot", "amazing", "perfect", "ultimate", "exclusive", "certified",
    "brand", "included", "includes", "compatible", "works", "designed", "made", "gift",
    "gifts", "holiday", "christmas",
    // category filler
    "smart", "speaker", "alexa", "assistant", "device", "devices", "home", "kids", "adults",
    "men", "women", "unisex", "portable", "wireless", "hands", "built",
    // colours
    "black", "white", "charcoal", "silver", "gray", "grey", "blue", "red", "green", "gold",
    "pink", "purple", "yellow", "orange", "rose", "midnight", "starlight", "graphite",
    "sandstone", "glacier", "navy", "beige",
];

/// Parenthetical phrases that are dropped entirely, matched case-insensitively
/// including the brackets.
pub const REMOVABLE_PARENTHETICALS: &[&str] = &[
    "(updated)",
    "(renewed)",
    "(refurbished)",
    "(latest model)",
    "(newest model)",
    "(new)",
    "(new model)",
    "(international version)",
    "(us version)",
    "(certified refurbished)",
    "(renewed premium)",
    "(pack of 1)",
];

/// Known consumer brands. Order matters for the fallback extractor, which
/// takes the first listed brand found in the text.
pub const KNOWN_BRANDS: &[&str] = &[
    "Apple", "Samsung", "Google", "Sony", "Bose", "Amazon", "Microsoft", "Nintendo", "Dell",
    "HP", "Lenovo", "Asus", "Acer", "MSI", "Razer", "Logitech", "Corsair", "SteelSeries",
    "HyperX", "LG", "TCL", "Hisense", "Vizio", "Panasonic", "Philips", "JBL", "Sennheiser",
    "Beats", "Anker", "Soundcore", "Jabra", "Skullcandy", "Audio-Technica", "Marshall",
    "Sonos", "OnePlus", "Xiaomi", "Huawei", "Oppo", "Motorola", "Nokia", "Garmin", "Fitbit",
    "GoPro", "DJI", "Canon", "Nikon", "Fujifilm", "Dyson", "Roomba", "iRobot", "Shark",
    "Ninja", "Instant Pot", "KitchenAid", "Breville", "Keurig", "Nespresso", "Vitamix",
    "Kindle", "Echo", "Ring", "Nest", "Roku", "Nvidia", "AMD", "Intel", "Western Digital",
    "Seagate", "SanDisk", "Crucial", "Kingston", "Belkin", "Ugreen", "Eufy", "Wyze",
    "Arlo", "Meta", "Oculus", "Valve", "Steam Deck", "PlayStation", "Xbox",
];

/// Upper-case tokens kept verbatim when re-casing shouted titles.
pub const ACRONYMS: &[&str] = &[
    "USB", "USB-C", "HDMI", "SSD", "HDD", "NVME", "OLED", "QLED", "LED", "LCD", "4K", "8K",
    "HDR", "WI-FI", "WIFI", "NFC", "GPS", "RGB", "CPU", "GPU", "RAM", "ANC", "LTE", "5G",
    "AMD", "MSI", "JBL", "DJI", "TCL", "AOC", "RTX", "GTX", "DDR4", "DDR5", "PC", "TV", "AI",
    "VR", "AR", "IPS", "VA", "FPS", "MAH", "USB-A", "PD", "AC", "DC", "ASMR",
];

/// Terms that make a subtitle worth keeping in a search query.
pub const TECH_TERMS: &[&str] = &[
    "pro", "max", "ultra", "plus", "mini", "lite", "air", "wifi", "wi-fi", "5g", "4k", "8k",
    "oled", "qled", "bluetooth", "usb-c", "anc", "noise cancelling", "noise canceling",
    "gen", "generation", "cellular", "gps", "hdr", "amoled", "mesh", "gaming",
];

/// Qualifiers that suggest a comparison search against the base model.
pub const QUALIFIER_WORDS: &[&str] = &["pro", "plus", "max", "ultra"];

pub fn is_marketing_word(token: &str) -> bool {
    MARKETING_WORDS.contains(&token)
}

pub fn is_acronym(token: &str) -> bool {
    let upper = token.to_uppercase();
    ACRONYMS.iter().any(|acronym| *acronym == upper)
}

/// Finds a known brand among lowercased tokens, returning the token as written.
pub fn find_brand_token<'a>(tokens: &[&'a str]) -> Option<&'a str> {
    tokens.iter().copied().find(|token| {
        KNOWN_BRANDS
            .iter()
            .any(|brand| !brand.contains(' ') && brand.eq_ignore_ascii_case(token))
    })
}
