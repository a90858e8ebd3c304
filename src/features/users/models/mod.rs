pub mod account;

pub use account::{
    normalize_vehicle_categories, Account, AccountInfoUpdate, AccountStatus, DocumentSlot,
    DriverInfoUpdate, NewAccount,
};
