//! Deterministic content corpus shared by the integration suites.
//!
//! Layout (location ids in parentheses):
//! - Home (2) with Shop (67), Products (69) holding seven products (70-76)
//!   and News (133) holding the "Applied webpage" article (193)
//! - Users (5) with the user groups Members (12), Administrator users (13),
//!   Editors (14), Anonymous Users (44) and Partners (227); the users
//!   Administrator User (15) and Anonymous User (45, also placed at 80)
//! - Media (43) with Images (51), Setup (48), Design (58)

use ferrum_search::SqlGateway;

pub const BASE_CREATED: i64 = 1_033_917_596;
pub const BASE_MODIFIED: i64 = 1_033_920_830;

pub const USERS_REMOTE_ID: &str = "f5c88a2209584891056f987fd965b0ba";
pub const ANONYMOUS_REMOTE_ID: &str = "faaeb9be3bd98ed09f606fc16d144eca";

pub const DRAFT: i64 = 0;
pub const PUBLISHED: i64 = 1;
pub const ARCHIVED: i64 = 2;

/// Content type id of products.
pub const PRODUCT_TYPE: i64 = 20;

/// Product content ids with their price sort key.
pub const PRODUCT_PRICES: [(i64, i64); 7] = [
    (68, 500),
    (69, 10_000),
    (70, 2_000_000),
    (71, 50_000),
    (72, 1_000_000),
    (73, 9_999),
    (74, 1_000_001),
];

pub struct ContentFixture {
    pub id: i64,
    pub content_type_id: i64,
    pub section_id: i64,
    pub status: i64,
    pub name: &'static str,
    pub current_version: i64,
    pub created: i64,
    pub modified: i64,
}

const fn item(id: i64, content_type_id: i64, section_id: i64, name: &'static str) -> ContentFixture {
    ContentFixture {
        id,
        content_type_id,
        section_id,
        status: PUBLISHED,
        name,
        current_version: 1,
        created: BASE_CREATED,
        modified: BASE_MODIFIED,
    }
}

pub fn content() -> Vec<ContentFixture> {
    let mut items = vec![
        item(4, 3, 2, "Users"),
        item(10, 4, 2, "Anonymous User"),
        ContentFixture {
            modified: 1_311_154_215,
            ..item(11, 3, 2, "Members")
        },
        item(12, 3, 2, "Administrator users"),
        ContentFixture {
            current_version: 2,
            ..item(13, 3, 2, "Editors")
        },
        ContentFixture {
            modified: 1_311_154_214,
            ..item(14, 4, 2, "Administrator User")
        },
        item(41, 1, 3, "Media"),
        item(42, 3, 2, "Anonymous Users"),
        item(45, 1, 4, "Setup"),
        item(49, 1, 3, "Images"),
        ContentFixture {
            status: ARCHIVED,
            ..item(56, 1, 5, "Design")
        },
        item(65, 1, 1, "Home"),
        ContentFixture {
            status: DRAFT,
            created: 1_299_780_749,
            modified: 1_299_780_749,
            ..item(66, 1, 1, "Shop")
        },
        item(67, 1, 1, "Products"),
        ContentFixture {
            created: 1_305_000_000,
            modified: 1_305_000_000,
            ..item(131, 1, 1, "News")
        },
        item(191, 21, 1, "Applied webpage"),
        ContentFixture {
            created: 1_311_154_215,
            modified: 1_311_154_215,
            ..item(225, 3, 1, "Partners")
        },
    ];
    items.extend(
        PRODUCT_PRICES
            .iter()
            .map(|(id, _)| item(*id, PRODUCT_TYPE, 1, "Product")),
    );
    items.sort_by_key(|c| c.id);
    items
}

/// Every content id in the corpus, ascending.
pub fn all_content_ids() -> Vec<i64> {
    content().iter().map(|c| c.id).collect()
}

const CONTENT_TYPES: [(i64, &str); 5] = [
    (1, "folder"),
    (3, "user_group"),
    (4, "user"),
    (PRODUCT_TYPE, "product"),
    (21, "article"),
];

const GROUP_LINKS: [(i64, i64); 5] = [(1, 1), (3, 2), (4, 2), (PRODUCT_TYPE, 3), (21, 1)];

const FIELD_DEFINITIONS: [(i64, i64, &str, &str); 6] = [
    (7, 3, "name", "ezstring"),
    (8, 4, "first_name", "ezstring"),
    (30, PRODUCT_TYPE, "price", "ezprice"),
    (31, PRODUCT_TYPE, "name", "ezstring"),
    (32, PRODUCT_TYPE, "specs", "ezmatrix"),
    (40, 21, "title", "ezstring"),
];

/// (id, content_id, version, field_definition_id, sort_key_string)
const STRING_FIELDS: [(i64, i64, i64, i64, &str); 10] = [
    (100, 4, 1, 7, "users"),
    (101, 11, 1, 7, "members"),
    (102, 12, 1, 7, "administrator users"),
    // Stale value from the previous version of Editors
    (103, 13, 1, 7, "members"),
    (104, 13, 2, 7, "editors"),
    (105, 42, 1, 7, "anonymous users"),
    (106, 225, 1, 7, "partners"),
    (110, 10, 1, 8, "anonymous"),
    (111, 14, 1, 8, "administrator"),
    (140, 191, 1, 40, "applied webpage"),
];

/// (id, content_id, parent_id, path_string, depth)
const LOCATIONS: [(i64, i64, i64, &str, i64); 26] = [
    (2, 65, 1, "/1/2/", 1),
    (5, 4, 1, "/1/5/", 1),
    (12, 11, 5, "/1/5/12/", 2),
    (13, 12, 5, "/1/5/13/", 2),
    (14, 13, 5, "/1/5/14/", 2),
    (15, 14, 13, "/1/5/13/15/", 3),
    (43, 41, 1, "/1/43/", 1),
    (44, 42, 5, "/1/5/44/", 2),
    (45, 10, 44, "/1/5/44/45/", 3),
    (48, 45, 1, "/1/48/", 1),
    (51, 49, 43, "/1/43/51/", 2),
    (58, 56, 1, "/1/58/", 1),
    (67, 66, 2, "/1/2/67/", 2),
    (69, 67, 2, "/1/2/69/", 2),
    (70, 68, 69, "/1/2/69/70/", 3),
    (71, 69, 69, "/1/2/69/71/", 3),
    (72, 70, 69, "/1/2/69/72/", 3),
    (73, 71, 69, "/1/2/69/73/", 3),
    (74, 72, 69, "/1/2/69/74/", 3),
    (75, 73, 69, "/1/2/69/75/", 3),
    (76, 74, 69, "/1/2/69/76/", 3),
    (80, 10, 12, "/1/5/12/80/", 3),
    (133, 131, 2, "/1/2/133/", 2),
    (193, 191, 133, "/1/2/133/193/", 3),
    (227, 225, 5, "/1/5/227/", 2),
    (228, 66, 2, "/1/2/228/", 2),
];

/// Corpus frequency of "the"; above the default threshold of 20.
pub const THE_FREQUENCY: i64 = 24;

/// (id, word, content ids)
fn search_words() -> Vec<(i64, &'static str, Vec<i64>)> {
    vec![
        (1, "the", all_content_ids()),
        (2, "applied", vec![191]),
        (3, "webpage", vec![191]),
        (4, "members", vec![11]),
        (5, "products", vec![67]),
    ]
}

pub async fn seed(gateway: &SqlGateway) -> anyhow::Result<()> {
    let pool = gateway.pool();

    for (id, identifier) in CONTENT_TYPES {
        sqlx::query("INSERT INTO content_type (id, identifier) VALUES ($1, $2)")
            .bind(id)
            .bind(identifier)
            .execute(pool)
            .await?;
    }

    for (content_type_id, group_id) in GROUP_LINKS {
        sqlx::query("INSERT INTO content_type_group_link (content_type_id, group_id) VALUES ($1, $2)")
            .bind(content_type_id)
            .bind(group_id)
            .execute(pool)
            .await?;
    }

    for c in content() {
        let remote_id = match c.id {
            4 => USERS_REMOTE_ID.to_string(),
            10 => ANONYMOUS_REMOTE_ID.to_string(),
            id => format!("remote-{id}"),
        };
        sqlx::query(
            "INSERT INTO content (id, content_type_id, section_id, status, remote_id, name, \
             current_version, created, modified) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(c.id)
        .bind(c.content_type_id)
        .bind(c.section_id)
        .bind(c.status)
        .bind(remote_id)
        .bind(c.name)
        .bind(c.current_version)
        .bind(c.created)
        .bind(c.modified)
        .execute(pool)
        .await?;
    }

    for (id, content_type_id, identifier, data_type) in FIELD_DEFINITIONS {
        sqlx::query(
            "INSERT INTO field_definition (id, content_type_id, identifier, data_type) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(content_type_id)
        .bind(identifier)
        .bind(data_type)
        .execute(pool)
        .await?;
    }

    for (id, content_id, version, field_definition_id, value) in STRING_FIELDS {
        insert_field(gateway, id, content_id, version, field_definition_id, "ezstring", Some(value), None)
            .await?;
    }
    for (offset, (content_id, price)) in PRODUCT_PRICES.iter().enumerate() {
        let offset = offset as i64;
        insert_field(gateway, 120 + offset, *content_id, 1, 30, "ezprice", None, Some(*price)).await?;
        let name = format!("product {content_id}");
        insert_field(gateway, 130 + offset, *content_id, 1, 31, "ezstring", Some(name.as_str()), None).await?;
    }

    for (id, content_id, parent_id, path_string, depth) in LOCATIONS {
        sqlx::query(
            "INSERT INTO location (id, content_id, parent_id, path_string, depth) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(content_id)
        .bind(parent_id)
        .bind(path_string)
        .bind(depth)
        .execute(pool)
        .await?;
    }

    let mut link_id = 1_i64;
    for (word_id, word, content_ids) in search_words() {
        sqlx::query("INSERT INTO search_word (id, word, object_count) VALUES ($1, $2, $3)")
            .bind(word_id)
            .bind(word)
            .bind(content_ids.len() as i64)
            .execute(pool)
            .await?;
        for content_id in content_ids {
            sqlx::query("INSERT INTO search_word_link (id, word_id, content_id) VALUES ($1, $2, $3)")
                .bind(link_id)
                .bind(word_id)
                .bind(content_id)
                .execute(pool)
                .await?;
            link_id += 1;
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn insert_field(
    gateway: &SqlGateway,
    id: i64,
    content_id: i64,
    version: i64,
    field_definition_id: i64,
    data_type: &str,
    sort_key_string: Option<&str>,
    sort_key_int: Option<i64>,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO content_field (id, content_id, version, field_definition_id, data_type, \
         language_code, sort_key_string, sort_key_int) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(id)
    .bind(content_id)
    .bind(version)
    .bind(field_definition_id)
    .bind(data_type.to_string())
    .bind("eng-GB")
    .bind(sort_key_string.map(str::to_string))
    .bind(sort_key_int)
    .execute(gateway.pool())
    .await?;
    Ok(())
}
