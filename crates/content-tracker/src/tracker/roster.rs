use serde::Serialize;

use super::domain::EmployeeId;

/// A team member who is expected to publish one contribution per month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,
    pub email: String,
}

/// Static team roster. Not mutated at runtime.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    employees: Vec<Employee>,
}

const TEAM: [(u32, &str, &str, &str); 7] = [
    (1, "Asgeir", "", "asgeir@m51.no"),
    (2, "Daniel", "", "daniel@m51.no"),
    (3, "Eirik", "", "eirik@m51.no"),
    (4, "Elisabeth", "", "elisabeth@m51.no"),
    (5, "Jonathan", "", "jonathan@m51.no"),
    (7, "Mathias", "", "mathias@m51.no"),
    (6, "Emma", "Tech Lead", "emma@m51.no"),
];

impl Roster {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    /// The production team, in display order.
    pub fn team() -> Self {
        let employees = TEAM
            .iter()
            .map(|(id, name, role, email)| Employee {
                id: EmployeeId(*id),
                name: (*name).to_string(),
                role: (*role).to_string(),
                email: (*email).to_string(),
            })
            .collect();
        Self { employees }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn get(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    pub fn by_email(&self, email: &str) -> Option<&Employee> {
        let email = email.trim();
        self.employees
            .iter()
            .find(|employee| employee.email.eq_ignore_ascii_case(email))
    }
}
