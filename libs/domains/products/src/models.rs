use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Copies every `Some` field of `$from` over `$into`.
macro_rules! merge_some {
    ($into:expr, $from:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $from.$field {
                $into.$field = Some(value);
            }
        )+
    };
}

/// Chemical and physical properties shown on the product sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChemicalAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_aspect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viscosity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solubility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flammable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refraction_index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dilution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_toxic: Option<bool>,
}

impl ChemicalAttributes {
    fn merge(&mut self, update: ChemicalAttributes) {
        merge_some!(self, update;
            physical_aspect, smell, color, fragance, gravity, viscosity, solubility,
            flammable, density, ph, active_component, weight, refraction_index,
            dilution, is_toxic,
        );
    }
}

/// Marketing copy for the product landing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarketingCopy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_title: Option<String>,
}

impl MarketingCopy {
    fn merge(&mut self, update: MarketingCopy) {
        merge_some!(self, update;
            paragraph1, paragraph2, paragraph3, paragraph4, step_title, steps, promo_title,
        );
    }
}

/// Catalog product, stored in the `products` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stored as `_id`
    #[serde(rename = "_id", alias = "id", with = "database::mongodb::uuid_string")]
    pub id: Uuid,
    pub name: String,
    /// Category label used for filtering
    pub business_line: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classificator: Option<String>,
    #[serde(flatten)]
    pub attributes: ChemicalAttributes,
    #[serde(flatten)]
    pub marketing: MarketingCopy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /api/product`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub business_line: String,
    #[validate(range(min = 0.0, message = "must be zero or more"))]
    pub price: f64,
    #[validate(range(min = 0, message = "must be zero or more"))]
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub description: String,
    pub model: Option<String>,
    pub classificator: Option<String>,
    #[serde(flatten)]
    pub attributes: ChemicalAttributes,
    #[serde(flatten)]
    pub marketing: MarketingCopy,
}

/// Payload for `PUT /api/product/{id}`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub business_line: Option<String>,
    #[validate(range(min = 0.0, message = "must be zero or more"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "must be zero or more"))]
    pub quantity: Option<i64>,
    pub description: Option<String>,
    pub model: Option<String>,
    pub classificator: Option<String>,
    #[serde(flatten)]
    pub attributes: ChemicalAttributes,
    #[serde(flatten)]
    pub marketing: MarketingCopy,
}

/// `from` query parameter shared by the listing routes.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page index; each page holds 11 products
    pub from: Option<String>,
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// `ceil(matching / 11)`
    pub pages: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessLines {
    pub business_lines: Vec<String>,
}

/// Response for create, update and delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MutationResponse {
    pub message: String,
    pub product: Product,
}

impl Product {
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            business_line: input.business_line,
            price: input.price,
            quantity: input.quantity,
            description: input.description,
            model: input.model,
            classificator: input.classificator,
            attributes: input.attributes,
            marketing: input.marketing,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(business_line) = update.business_line {
            self.business_line = business_line;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        merge_some!(self, update; model, classificator);
        self.attributes.merge(update.attributes);
        self.marketing.merge(update.marketing);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;
    use serde_json::json;

    fn solvent() -> Product {
        let input: CreateProduct = serde_json::from_value(json!({
            "name": "Xylene",
            "businessLine": "Solvents",
            "price": 12.5,
            "quantity": 40,
            "description": "Aromatic solvent",
            "smell": "sweet",
            "flammable": true,
            "steps": ["Dilute", "Apply"]
        }))
        .unwrap();
        Product::new(input)
    }

    #[test]
    fn test_flattened_fields_round_trip_camel_case() {
        let value = serde_json::to_value(solvent()).unwrap();

        assert_eq!(value["businessLine"], "Solvents");
        assert_eq!(value["smell"], "sweet");
        assert_eq!(value["flammable"], true);
        assert_eq!(value["steps"], json!(["Dilute", "Apply"]));
        assert!(value.get("_id").is_some());
        assert!(value.get("isToxic").is_none());
    }

    #[test]
    fn test_partial_update_keeps_unspecified_fields() {
        let mut product = solvent();
        let before = product.clone();

        let update: UpdateProduct = serde_json::from_value(json!({
            "price": 14.0,
            "color": "clear"
        }))
        .unwrap();
        product.apply_update(update);

        assert_eq!(product.price, 14.0);
        assert_eq!(product.attributes.color.as_deref(), Some("clear"));
        assert_eq!(product.name, before.name);
        assert_eq!(product.quantity, before.quantity);
        assert_eq!(product.attributes.smell, before.attributes.smell);
        assert_eq!(product.marketing.steps, before.marketing.steps);
        assert!(product.updated_at >= before.updated_at);
    }

    #[test]
    fn test_negative_price_and_quantity_fail_validation() {
        let input = CreateProduct {
            name: "Acid".into(),
            business_line: "Acids".into(),
            price: -1.0,
            quantity: -2,
            ..CreateProduct::default()
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("quantity"));
    }

    #[test]
    fn test_product_reads_back_from_raw_bson() {
        let product = solvent();

        let document = bson::to_document(&product).unwrap();
        assert_eq!(document.get_str("_id").unwrap(), product.id.to_string());

        let bytes = bson::to_vec(&document).unwrap();
        let decoded: Product = bson::from_slice(&bytes).unwrap();
        assert_eq!(decoded, product);
    }
}
