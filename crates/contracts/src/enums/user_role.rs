use crate::string_enum;

string_enum! {
    /// Role of a signed-in user. Decides which screens the dashboard shows.
    pub enum UserRole {
        Admin => ("admin", "Admin"),
        Dispatcher => ("dispatcher", "Dispatcher"),
        Driver => ("driver", "Driver"),
        Paramedic => ("paramedic", "Paramedic"),
    }
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Crew roles only ever see their own inspection records.
    pub fn is_crew(&self) -> bool {
        matches!(self, UserRole::Driver | UserRole::Paramedic)
    }
}
