//! Esquema Diesel (escrito a mano). Reemplazable con `diesel print-schema`.

diesel::table! {
    process_definitions (id, version) {
        id -> Uuid,
        version -> Integer,
        flow_id -> Text,
        name -> Text,
        description -> Text,
        last_modified -> Timestamptz,
        status -> Integer,
        digest -> Text,
        encoded_definition -> Text,
        accounts -> Jsonb,
    }
}
