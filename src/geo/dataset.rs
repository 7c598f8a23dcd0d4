//! Province reference data: the embedded table and the JSON dataset loader.

use super::types::{GeoError, ProvinceRecord, Result};
use std::fs;
use std::path::Path;

// ─── Built-in dataset ───────────────────────────────────────────

struct BuiltinProvince {
    code: &'static str,
    name: &'static str,
    seat: &'static str,
    region: &'static str,
    aliases: &'static [&'static str],
}

const fn p(
    code: &'static str,
    name: &'static str,
    seat: &'static str,
    region: &'static str,
    aliases: &'static [&'static str],
) -> BuiltinProvince {
    BuiltinProvince { code, name, seat, region, aliases }
}

/// Parts of hyphenated names ("Forlì-Cesena") are added at build time, not listed here.
const BUILTIN_PROVINCES: &[BuiltinProvince] = &[
    // Piemonte
    p("TO", "Torino", "Torino", "Piemonte", &["Turin"]),
    p("VC", "Vercelli", "Vercelli", "Piemonte", &[]),
    p("NO", "Novara", "Novara", "Piemonte", &[]),
    p("CN", "Cuneo", "Cuneo", "Piemonte", &[]),
    p("AT", "Asti", "Asti", "Piemonte", &[]),
    p("AL", "Alessandria", "Alessandria", "Piemonte", &[]),
    p("BI", "Biella", "Biella", "Piemonte", &[]),
    p("VB", "Verbano-Cusio-Ossola", "Verbania", "Piemonte", &["VCO"]),
    // Valle d'Aosta
    p("AO", "Aosta", "Aosta", "Valle d'Aosta", &["Aoste", "Valle d'Aosta"]),
    // Lombardia
    p("MI", "Milano", "Milano", "Lombardia", &["Milan"]),
    p("BG", "Bergamo", "Bergamo", "Lombardia", &[]),
    p("BS", "Brescia", "Brescia", "Lombardia", &[]),
    p("CO", "Como", "Como", "Lombardia", &[]),
    p("CR", "Cremona", "Cremona", "Lombardia", &[]),
    p("LC", "Lecco", "Lecco", "Lombardia", &[]),
    p("LO", "Lodi", "Lodi", "Lombardia", &[]),
    p("MN", "Mantova", "Mantova", "Lombardia", &["Mantua"]),
    p("MB", "Monza e della Brianza", "Monza", "Lombardia", &["Monza e Brianza", "Monza-Brianza", "Brianza"]),
    p("PV", "Pavia", "Pavia", "Lombardia", &[]),
    p("SO", "Sondrio", "Sondrio", "Lombardia", &["Valtellina"]),
    p("VA", "Varese", "Varese", "Lombardia", &[]),
    // Trentino-Alto Adige
    p("TN", "Trento", "Trento", "Trentino-Alto Adige", &["Trentino"]),
    p("BZ", "Bolzano", "Bolzano", "Trentino-Alto Adige", &["Bozen", "Alto Adige", "Südtirol"]),
    // Veneto
    p("VE", "Venezia", "Venezia", "Veneto", &["Venice"]),
    p("VR", "Verona", "Verona", "Veneto", &[]),
    p("VI", "Vicenza", "Vicenza", "Veneto", &[]),
    p("PD", "Padova", "Padova", "Veneto", &["Padua"]),
    p("TV", "Treviso", "Treviso", "Veneto", &[]),
    p("RO", "Rovigo", "Rovigo", "Veneto", &[]),
    p("BL", "Belluno", "Belluno", "Veneto", &[]),
    // Friuli-Venezia Giulia
    p("TS", "Trieste", "Trieste", "Friuli-Venezia Giulia", &[]),
    p("UD", "Udine", "Udine", "Friuli-Venezia Giulia", &[]),
    p("GO", "Gorizia", "Gorizia", "Friuli-Venezia Giulia", &[]),
    p("PN", "Pordenone", "Pordenone", "Friuli-Venezia Giulia", &[]),
    // Liguria
    p("GE", "Genova", "Genova", "Liguria", &["Genoa"]),
    p("SP", "La Spezia", "La Spezia", "Liguria", &["Spezia"]),
    p("SV", "Savona", "Savona", "Liguria", &[]),
    p("IM", "Imperia", "Imperia", "Liguria", &[]),
    // Emilia-Romagna
    p("BO", "Bologna", "Bologna", "Emilia-Romagna", &[]),
    p("MO", "Modena", "Modena", "Emilia-Romagna", &[]),
    p("PR", "Parma", "Parma", "Emilia-Romagna", &[]),
    p("RE", "Reggio Emilia", "Reggio Emilia", "Emilia-Romagna", &["Reggio nell'Emilia"]),
    p("PC", "Piacenza", "Piacenza", "Emilia-Romagna", &[]),
    p("FE", "Ferrara", "Ferrara", "Emilia-Romagna", &[]),
    p("RA", "Ravenna", "Ravenna", "Emilia-Romagna", &[]),
    p("FC", "Forlì-Cesena", "Forlì", "Emilia-Romagna", &["Forlì e Cesena"]),
    p("RN", "Rimini", "Rimini", "Emilia-Romagna", &[]),
    // Toscana
    p("FI", "Firenze", "Firenze", "Toscana", &["Florence"]),
    p("PI", "Pisa", "Pisa", "Toscana", &[]),
    p("LI", "Livorno", "Livorno", "Toscana", &["Leghorn"]),
    p("LU", "Lucca", "Lucca", "Toscana", &[]),
    p("MS", "Massa-Carrara", "Massa", "Toscana", &["Massa e Carrara", "Apuania"]),
    p("PT", "Pistoia", "Pistoia", "Toscana", &[]),
    p("PO", "Prato", "Prato", "Toscana", &[]),
    p("AR", "Arezzo", "Arezzo", "Toscana", &[]),
    p("SI", "Siena", "Siena", "Toscana", &[]),
    p("GR", "Grosseto", "Grosseto", "Toscana", &[]),
    // Umbria
    p("PG", "Perugia", "Perugia", "Umbria", &[]),
    p("TR", "Terni", "Terni", "Umbria", &[]),
    // Marche
    p("AN", "Ancona", "Ancona", "Marche", &[]),
    p("PU", "Pesaro e Urbino", "Pesaro", "Marche", &["Pesaro-Urbino", "Urbino"]),
    p("MC", "Macerata", "Macerata", "Marche", &[]),
    p("AP", "Ascoli Piceno", "Ascoli Piceno", "Marche", &["Ascoli"]),
    p("FM", "Fermo", "Fermo", "Marche", &[]),
    // Lazio
    p("RM", "Roma", "Roma", "Lazio", &["Rome", "Roma Capitale"]),
    p("LT", "Latina", "Latina", "Lazio", &["Littoria"]),
    p("FR", "Frosinone", "Frosinone", "Lazio", &[]),
    p("VT", "Viterbo", "Viterbo", "Lazio", &[]),
    p("RI", "Rieti", "Rieti", "Lazio", &[]),
    // Abruzzo
    p("AQ", "L'Aquila", "L'Aquila", "Abruzzo", &["Aquila", "Aquila degli Abruzzi"]),
    p("TE", "Teramo", "Teramo", "Abruzzo", &[]),
    p("PE", "Pescara", "Pescara", "Abruzzo", &[]),
    p("CH", "Chieti", "Chieti", "Abruzzo", &[]),
    // Molise
    p("CB", "Campobasso", "Campobasso", "Molise", &[]),
    p("IS", "Isernia", "Isernia", "Molise", &[]),
    // Campania
    p("NA", "Napoli", "Napoli", "Campania", &["Naples"]),
    p("SA", "Salerno", "Salerno", "Campania", &[]),
    p("CE", "Caserta", "Caserta", "Campania", &[]),
    p("AV", "Avellino", "Avellino", "Campania", &[]),
    p("BN", "Benevento", "Benevento", "Campania", &[]),
    // Puglia
    p("BA", "Bari", "Bari", "Puglia", &[]),
    p("BT", "Barletta-Andria-Trani", "Barletta", "Puglia", &["BAT"]),
    p("TA", "Taranto", "Taranto", "Puglia", &[]),
    p("BR", "Brindisi", "Brindisi", "Puglia", &[]),
    p("LE", "Lecce", "Lecce", "Puglia", &[]),
    p("FG", "Foggia", "Foggia", "Puglia", &[]),
    // Basilicata
    p("PZ", "Potenza", "Potenza", "Basilicata", &[]),
    p("MT", "Matera", "Matera", "Basilicata", &[]),
    // Calabria
    p("CS", "Cosenza", "Cosenza", "Calabria", &[]),
    p("CZ", "Catanzaro", "Catanzaro", "Calabria", &[]),
    p("RC", "Reggio Calabria", "Reggio Calabria", "Calabria", &["Reggio di Calabria"]),
    p("KR", "Crotone", "Crotone", "Calabria", &[]),
    p("VV", "Vibo Valentia", "Vibo Valentia", "Calabria", &["Vibo"]),
    // Sicilia
    p("PA", "Palermo", "Palermo", "Sicilia", &[]),
    p("CT", "Catania", "Catania", "Sicilia", &[]),
    p("ME", "Messina", "Messina", "Sicilia", &[]),
    p("AG", "Agrigento", "Agrigento", "Sicilia", &["Girgenti"]),
    p("CL", "Caltanissetta", "Caltanissetta", "Sicilia", &[]),
    p("EN", "Enna", "Enna", "Sicilia", &[]),
    p("RG", "Ragusa", "Ragusa", "Sicilia", &[]),
    p("SR", "Siracusa", "Siracusa", "Sicilia", &["Syracuse"]),
    p("TP", "Trapani", "Trapani", "Sicilia", &[]),
    // Sardegna
    p("SS", "Sassari", "Sassari", "Sardegna", &[]),
    p("NU", "Nuoro", "Nuoro", "Sardegna", &[]),
    p("CA", "Cagliari", "Cagliari", "Sardegna", &[]),
    p("OR", "Oristano", "Oristano", "Sardegna", &[]),
    p("SU", "Sud Sardegna", "Carbonia", "Sardegna", &[]),
];

/// Number of provinces in the embedded table.
pub const BUILTIN_PROVINCE_COUNT: usize = BUILTIN_PROVINCES.len();

/// The embedded table as owned records, in table order.
pub fn builtin_records() -> Vec<ProvinceRecord> {
    BUILTIN_PROVINCES
        .iter()
        .map(|b| ProvinceRecord::new(b.code, b.name, b.seat, b.region, b.aliases))
        .collect()
}

// ─── JSON dataset ───────────────────────────────────────────────

/// Load records from a JSON array of province objects.
///
/// Only parses; uniqueness is checked when the records are handed to
/// [`GeoRegistry::build`](super::registry::GeoRegistry::build).
pub fn load_from_path(path: &Path) -> Result<Vec<ProvinceRecord>> {
    let data = fs::read_to_string(path).map_err(|source| GeoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<ProvinceRecord> = serde_json::from_str(&data).map_err(|source| GeoError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded province dataset");
    Ok(records)
}
