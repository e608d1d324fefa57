use std::fmt::Display;

use axum::response::IntoResponse;
use db::article;
use entitlement::{Role, Tier};
use serde_json::{json, Value};

/// Generate example values for OAPI documentation.
macro_rules! generate_examples {
    ($name:ident, $type:ty, $expr:expr) => {
        ::paste::paste! {
            #[doc = concat!("Generate example [`", stringify!($type), "`] value for OAPI documentation.")]
            pub(crate) fn [<example_ $name>]() -> $type {
                $expr
            }
        }
    };

    ($name:ident, $type:ty, $expr:expr; $($name_repeat:ident, $type_repeat:ty, $expr_repeat:expr);+) => {
        generate_examples!($name, $type, $expr);
        generate_examples!($($name_repeat, $type_repeat, $expr_repeat);+);
    }
}

/// Convert an error into a JSON value suitable for OAPI documentation.
pub(crate) fn example_error<E: Display + IntoResponse>(err: E) -> Value {
    let error = err.to_string();

    json! {{
        "code": err.into_response().status().as_u16(),
        "error": error,
    }}
}

generate_examples!(
    database_identifier, i64, 1;
    token, String, String::from("UYEIngStyH6Bxu1hLFIIwBxLgyMBhMQv4SVR1KzzbvzIDCSMcwwF8ApXagqyuWbh");
    email, String, String::from("reader@usethinkup.com");
    password, String, String::from("correct horse battery staple");
    display_name, String, String::from("Ada Reader");
    role, Role, Role::Subscriber;
    tier, Tier, Tier::TwoArticles;
    period, String, String::from("2026-10");
    remaining_reads, Option<usize>, Some(1);
    viewed, Vec<i64>, vec![3, 7];
    slug, String, String::from("why-we-read");
    category_slug, String, String::from("essays");
    category_name, String, String::from("Essays");
    title, String, String::from("Why we read");
    excerpt, String, String::from("A short note on attention and long-form writing.");
    content, String, String::from("<p>Reading is a slow act.</p>");
    article_status, article::Status, article::Status::Published;
    timestamp, i64, 1760000000
);
