pub mod auth {
    pub mod entitlements;
}

pub mod db {
    pub mod postgres;
}

pub mod utils {
    pub mod clock;
    pub mod valid_uuid;
}
