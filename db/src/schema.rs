table! {
    switchboards (id) {
        id -> BigInt,
        access_code -> Text,
    }
}

table! {
    switchboard_modules (id) {
        id -> BigInt,
        switchboard_id -> BigInt,
        parent_id -> Nullable<BigInt>,
        level -> Integer,
        phone_key -> Text,
        slug -> Text,
    }
}

table! {
    module_settings (id) {
        id -> BigInt,
        module_id -> BigInt,
        key -> Text,
        value -> Text,
    }
}
