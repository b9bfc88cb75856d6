#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Bursar = 2,
    Teacher = 3,
    Staff = 4,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Bursar),
            3 => Some(Role::Teacher),
            4 => Some(Role::Staff),
            _ => None,
        }
    }
}
