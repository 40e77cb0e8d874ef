//! Diesel schema for account persistence.

diesel::table! {
    /// Citizen and representative accounts.
    users (id) {
        /// Account identifier.
        id -> Uuid,
        /// Unique login name.
        #[max_length = 150]
        username -> Varchar,
        /// Representative tier; null for citizens.
        #[max_length = 20]
        representative_level -> Nullable<Varchar>,
        /// Jurisdiction state.
        #[max_length = 100]
        state -> Nullable<Varchar>,
        /// Jurisdiction district.
        #[max_length = 100]
        district -> Nullable<Varchar>,
        /// Jurisdiction taluka.
        #[max_length = 100]
        taluka -> Nullable<Varchar>,
    }
}
