use super::domain::{Severity, TreatmentProfile};
use crate::workflows::diagnosis::CatalogError;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const STANDARD_TREATMENTS: [(&str, u32, u32, Severity); 31] = [
    ("Head and Neurological Injuries: Concussion", 45, 15, Severity::Medium),
    ("Head and Neurological Injuries: Traumatic Brain Injury (TBI)", 120, 30, Severity::Critical),
    ("Head and Neurological Injuries: Skull Fracture", 90, 25, Severity::High),
    ("Head and Neurological Injuries: Scalp Laceration", 30, 10, Severity::Low),
    ("Head and Neurological Injuries: Intracranial Haemorrhage", 180, 45, Severity::Critical),
    ("Head and Neurological Injuries: Seizure-Related Injury", 60, 20, Severity::High),
    ("Orthopedic Injuries: Fracture (Open/Closed)", 75, 20, Severity::Medium),
    ("Orthopedic Injuries: Dislocation", 45, 15, Severity::Medium),
    ("Orthopedic Injuries: Sprains and Strains", 25, 8, Severity::Low),
    ("Orthopedic Injuries: Tendon/Ligament Injury", 40, 12, Severity::Low),
    ("Orthopedic Injuries: Crush Injury", 90, 25, Severity::High),
    ("Orthopedic Injuries: Joint Injury (ACL Tear)", 50, 15, Severity::Medium),
    ("Orthopedic Injuries: Spinal Injury", 120, 35, Severity::Critical),
    ("Burns and Cold Injuries: Thermal Burn (3rd Degree)", 60, 20, Severity::High),
    ("Burns and Cold Injuries: Chemical Burn", 45, 15, Severity::High),
    ("Burns and Cold Injuries: Electrical Burn", 75, 25, Severity::High),
    ("Burns and Cold Injuries: Radiation Burn", 90, 30, Severity::High),
    ("Burns and Cold Injuries: Frostbite", 35, 12, Severity::Medium),
    ("Burns and Cold Injuries: Hypothermia Tissue Damage", 60, 20, Severity::Medium),
    ("Cardiovascular Emergencies: Penetrating Chest Trauma", 150, 40, Severity::Critical),
    ("Cardiovascular Emergencies: Blunt Cardiac Injury", 120, 35, Severity::Critical),
    ("Cardiovascular Emergencies: Rib Fracture (Flail Chest)", 90, 25, Severity::High),
    ("Cardiovascular Emergencies: Aortic Rupture", 180, 50, Severity::Critical),
    ("Cardiovascular Emergencies: Hemorrhagic Shock", 120, 35, Severity::Critical),
    ("Respiratory Injuries: Pneumothorax", 75, 20, Severity::High),
    ("Respiratory Injuries: Hemothorax", 90, 25, Severity::High),
    ("Respiratory Injuries: Airway Obstruction", 30, 10, Severity::Critical),
    ("Respiratory Injuries: Aspiration", 45, 15, Severity::High),
    ("Respiratory Injuries: Smoke Inhalation", 60, 20, Severity::High),
    ("Respiratory Injuries: Tracheal Rupture", 120, 35, Severity::Critical),
    ("No Injury", 0, 0, Severity::Low),
];

/// Read-only lookup from diagnosis name to its treatment profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreatmentCatalog {
    profiles: HashMap<String, TreatmentProfile>,
}

impl TreatmentCatalog {
    pub fn new(profiles: Vec<TreatmentProfile>) -> Result<Self, CatalogError> {
        let mut indexed = HashMap::with_capacity(profiles.len());
        for profile in profiles {
            if profile.diagnosis.is_empty() || indexed.contains_key(&profile.diagnosis) {
                return Err(CatalogError::InvalidTreatment(profile.diagnosis));
            }
            indexed.insert(profile.diagnosis.clone(), profile);
        }
        Ok(Self { profiles: indexed })
    }

    pub fn standard() -> Self {
        let profiles = STANDARD_TREATMENTS
            .iter()
            .map(|(diagnosis, expected, variability, severity)| {
                (
                    (*diagnosis).to_string(),
                    TreatmentProfile {
                        diagnosis: (*diagnosis).to_string(),
                        expected_minutes: *expected,
                        variability_minutes: *variability,
                        severity: *severity,
                    },
                )
            })
            .collect();
        Self { profiles }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads `diagnosis,expected_minutes,variability_minutes,severity` rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut profiles = Vec::new();
        for row in csv_reader.deserialize::<TreatmentRow>() {
            let row = row?;
            profiles.push(TreatmentProfile {
                diagnosis: row.diagnosis,
                expected_minutes: row.expected_minutes,
                variability_minutes: row.variability_minutes,
                severity: row.severity,
            });
        }

        Self::new(profiles)
    }

    /// Exact-name lookup; `None` is an expected miss (e.g. sentinel diagnoses).
    pub fn get(&self, diagnosis: &str) -> Option<&TreatmentProfile> {
        self.profiles.get(diagnosis)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct TreatmentRow {
    diagnosis: String,
    expected_minutes: u32,
    variability_minutes: u32,
    severity: Severity,
}
