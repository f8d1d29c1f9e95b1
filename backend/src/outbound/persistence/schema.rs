//! Diesel table definitions matching `backend/migrations`.

diesel::table! {
    users (id) {
        id -> Int8,
        #[max_length = 150]
        username -> Varchar,
        #[max_length = 150]
        first_name -> Varchar,
        #[max_length = 150]
        last_name -> Varchar,
        #[max_length = 128]
        password -> Varchar,
    }
}

diesel::table! {
    categories (id) {
        id -> Int8,
        #[max_length = 24]
        name -> Varchar,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    articles (id) {
        id -> Int8,
        #[max_length = 256]
        title -> Varchar,
        author_id -> Int8,
        #[max_length = 2]
        article_type -> Varchar,
        content -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    article_categories (article_id, category_id) {
        article_id -> Int8,
        category_id -> Int8,
    }
}

diesel::joinable!(articles -> users (author_id));
diesel::joinable!(article_categories -> articles (article_id));
diesel::joinable!(article_categories -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(users, categories, articles, article_categories);
