pub mod a001_ambulance;
pub mod a002_patient;
pub mod a003_emergency_call;
pub mod a004_trip;
pub mod a005_driver_inspection;
pub mod a006_paramedic_inspection;
pub mod a007_maintenance_record;
pub mod api_root;
pub mod reports;
