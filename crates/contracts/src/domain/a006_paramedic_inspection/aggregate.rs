use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use crate::domain::a005_driver_inspection::aggregate::{ReadinessStatus, Shift};
use crate::domain::common::{new_id, AggregateRoot, EntityMetadata};
use crate::string_enum;

string_enum! {
    pub enum EquipmentCategory {
        LifeSupport => ("life_support", "Life Support"),
        Monitoring => ("monitoring", "Monitoring"),
        Medication => ("medication", "Medication"),
        Surgical => ("surgical", "Surgical"),
        Diagnostic => ("diagnostic", "Diagnostic"),
        Safety => ("safety", "Safety"),
    }
}

/// One line of the paramedic's equipment checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalEquipmentItem {
    pub name: String,
    pub category: EquipmentCategory,
    pub is_working: bool,
    pub needs_replacement: bool,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MedicalEquipmentItem {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.map_or(false, |d| d < today)
    }
}

/// Start-of-shift equipment check filed by a paramedic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamedicInspection {
    pub id: String,
    pub paramedic_id: String,
    pub ambulance_id: String,
    pub date: NaiveDate,
    pub shift: Shift,
    pub medical_equipment: Vec<MedicalEquipmentItem>,
    pub overall_status: ReadinessStatus,
    pub additional_notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl ParamedicInspection {
    pub fn new_for_insert(dto: ParamedicInspectionDto, paramedic_id: String) -> Self {
        let metadata = EntityMetadata::new();
        Self {
            id: new_id(),
            paramedic_id,
            ambulance_id: dto.ambulance_id,
            date: dto.date,
            shift: dto.shift,
            medical_equipment: dto.medical_equipment,
            overall_status: dto.overall_status,
            additional_notes: dto.additional_notes,
            submitted_at: metadata.created_at,
            metadata,
        }
    }

    pub fn update(&mut self, dto: ParamedicInspectionDto) {
        self.ambulance_id = dto.ambulance_id;
        self.date = dto.date;
        self.shift = dto.shift;
        self.medical_equipment = dto.medical_equipment;
        self.overall_status = dto.overall_status;
        self.additional_notes = dto.additional_notes;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.medical_equipment.iter().any(|i| i.name.trim().is_empty()) {
            return Err("Every equipment item needs a name".into());
        }
        // Broken life-support gear cannot be signed off as ready
        let broken_life_support = self
            .medical_equipment
            .iter()
            .any(|i| i.category == EquipmentCategory::LifeSupport && !i.is_working);
        if broken_life_support && self.overall_status == ReadinessStatus::Ready {
            return Err("Ambulance with broken life-support equipment is not ready".into());
        }
        Ok(())
    }
}

impl AggregateRoot for ParamedicInspection {
    fn id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a006"
    }

    fn collection_name() -> &'static str {
        "paramedic_inspection"
    }

    fn element_name() -> &'static str {
        "Paramedic inspection"
    }

    fn list_name() -> &'static str {
        "Paramedic inspections"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamedicInspectionDto {
    /// Only admins may file on behalf of another paramedic
    #[serde(default)]
    pub paramedic_id: Option<String>,
    pub ambulance_id: String,
    pub date: NaiveDate,
    pub shift: Shift,
    #[serde(default)]
    pub medical_equipment: Vec<MedicalEquipmentItem>,
    pub overall_status: ReadinessStatus,
    #[serde(default)]
    pub additional_notes: Option<String>,
}
