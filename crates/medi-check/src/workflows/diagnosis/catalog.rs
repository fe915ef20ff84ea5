use super::domain::{CatalogError, Condition, ConditionCatalog, SymptomQuestion};
use std::io::Read;
use std::path::Path;

const STANDARD_QUESTIONS: [&str; 9] = [
    "Did the injury involve a blow to the head?",
    "Is there visible bleeding or an open wound?",
    "Are you having difficulty breathing?",
    "Is there severe pain when moving a limb or joint?",
    "Was the skin exposed to heat, chemicals, electricity or extreme cold?",
    "Have you lost consciousness or felt confused since the injury?",
    "Is there chest pain or pressure?",
    "Is the affected area visibly deformed or out of place?",
    "Is there swelling or bruising around the injury?",
];

const STANDARD_CONDITIONS: [(&str, [u8; 9]); 15] = [
    ("Head and Neurological Injuries: Concussion", [1, 0, 0, 0, 0, 1, 0, 0, 0]),
    ("Head and Neurological Injuries: Skull Fracture", [1, 1, 0, 0, 0, 1, 0, 1, 0]),
    ("Head and Neurological Injuries: Scalp Laceration", [1, 1, 0, 0, 0, 0, 0, 0, 0]),
    ("Orthopedic Injuries: Fracture (Open/Closed)", [0, 1, 0, 1, 0, 0, 0, 1, 1]),
    ("Orthopedic Injuries: Dislocation", [0, 0, 0, 1, 0, 0, 0, 1, 0]),
    ("Orthopedic Injuries: Sprains and Strains", [0, 0, 0, 1, 0, 0, 0, 0, 1]),
    ("Burns and Cold Injuries: Thermal Burn (3rd Degree)", [0, 1, 0, 0, 1, 0, 0, 0, 0]),
    ("Burns and Cold Injuries: Frostbite", [0, 0, 0, 0, 1, 0, 0, 0, 1]),
    ("Burns and Cold Injuries: Electrical Burn", [0, 1, 0, 0, 1, 1, 1, 0, 0]),
    ("Respiratory Injuries: Pneumothorax", [0, 0, 1, 0, 0, 0, 1, 0, 0]),
    ("Cardiovascular Emergencies: Rib Fracture (Flail Chest)", [0, 0, 1, 1, 0, 0, 1, 1, 0]),
    ("Respiratory Injuries: Smoke Inhalation", [0, 0, 1, 0, 1, 0, 0, 0, 0]),
    ("Respiratory Injuries: Airway Obstruction", [0, 0, 1, 0, 0, 1, 0, 0, 0]),
    ("Cardiovascular Emergencies: Blunt Cardiac Injury", [0, 0, 0, 0, 0, 1, 1, 0, 0]),
    ("No Injury", [0, 0, 0, 0, 0, 0, 0, 0, 0]),
];

impl ConditionCatalog {
    /// Built-in injury catalog whose names line up with the standard treatment table.
    pub fn standard() -> Self {
        let questions = STANDARD_QUESTIONS
            .iter()
            .enumerate()
            .map(|(index, text)| SymptomQuestion {
                index,
                text: (*text).to_string(),
            })
            .collect();
        let conditions = STANDARD_CONDITIONS
            .iter()
            .map(|(name, flags)| Condition::new(*name, flags.iter().map(|flag| *flag == 1).collect()))
            .collect();

        Self {
            questions,
            conditions,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads `name,<question>,…` headed CSV with one flag per question column.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let questions: Vec<String> = headers
            .iter()
            .skip(1)
            .map(|column| column.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut conditions = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let name = record.get(0).unwrap_or_default().to_string();
            if name.is_empty() {
                continue;
            }

            let found = record.len().saturating_sub(1);
            if found != questions.len() {
                return Err(CatalogError::SymptomCount {
                    condition: name,
                    expected: questions.len(),
                    found,
                });
            }

            let mut symptoms = Vec::with_capacity(questions.len());
            for (column, raw) in questions.iter().zip(record.iter().skip(1)) {
                let flag = parse_flag(raw).ok_or_else(|| CatalogError::InvalidSymptom {
                    condition: name.clone(),
                    column: column.clone(),
                    value: raw.to_string(),
                })?;
                symptoms.push(flag);
            }

            conditions.push(Condition::new(name, symptoms));
        }

        ConditionCatalog::new(questions, conditions)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
