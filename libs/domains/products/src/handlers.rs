//! HTTP handlers for the catalog API

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State},
    routing::get,
};
use axum_helpers::{
    AdminUser, JwtAuth, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestQueryResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    BusinessLines, ChemicalAttributes, CreateProduct, MarketingCopy, MutationResponse,
    PageParams, Product, ProductPage, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        list_by_business_line,
        list_by_price,
        list_by_business_line_and_price,
        search_products,
        business_line_list,
        get_product,
        create_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            Product, CreateProduct, UpdateProduct, ChemicalAttributes, MarketingCopy,
            ProductPage, BusinessLines, MutationResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestQueryResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Chemical catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Router state: the service plus the token verifier used by [`AdminUser`].
pub struct ProductsState<R: ProductRepository> {
    pub service: Arc<ProductService<R>>,
    pub auth: JwtAuth,
}

impl<R: ProductRepository> Clone for ProductsState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            auth: self.auth.clone(),
        }
    }
}

impl<R: ProductRepository> FromRef<ProductsState<R>> for JwtAuth {
    fn from_ref(state: &ProductsState<R>) -> Self {
        state.auth.clone()
    }
}

pub fn router<R: ProductRepository + 'static>(service: ProductService<R>, auth: JwtAuth) -> Router {
    let state = ProductsState {
        service: Arc::new(service),
        auth,
    };

    Router::new()
        .route("/", get(list_products::<R>).post(create_product::<R>))
        .route("/businesslinelist", get(business_line_list::<R>))
        .route("/businessline/{businessline}", get(list_by_business_line::<R>))
        .route("/price/{price}", get(list_by_price::<R>))
        .route(
            "/businessline/{businessline}/price/{price}",
            get(list_by_business_line_and_price::<R>),
        )
        .route("/search/{search}", get(search_products::<R>))
        .route(
            "/{id}",
            get(get_product::<R>)
                .put(update_product::<R>)
                .delete(delete_product::<R>),
        )
        .with_state(state)
}

/// List the catalog
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(PageParams),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    Query(params): Query<PageParams>,
) -> ProductResult<Json<ProductPage>> {
    let page = state
        .service
        .list_products(None, None, params.from.as_deref())
        .await?;
    Ok(Json(page))
}

/// List products whose business line contains the segment
#[utoipa::path(
    get,
    path = "/businessline/{businessline}",
    tag = "Products",
    params(
        ("businessline" = String, Path, description = "Business line, matched case-insensitively"),
        PageParams
    ),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_business_line<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    Path(business_line): Path<String>,
    Query(params): Query<PageParams>,
) -> ProductResult<Json<ProductPage>> {
    let page = state
        .service
        .list_products(Some(&business_line), None, params.from.as_deref())
        .await?;
    Ok(Json(page))
}

/// List products priced within an inclusive range
#[utoipa::path(
    get,
    path = "/price/{price}",
    tag = "Products",
    params(
        ("price" = String, Path, description = "Inclusive range as `<low>-<high>`", example = "10-50"),
        PageParams
    ),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_price<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    Path(price): Path<String>,
    Query(params): Query<PageParams>,
) -> ProductResult<Json<ProductPage>> {
    let page = state
        .service
        .list_products(None, Some(&price), params.from.as_deref())
        .await?;
    Ok(Json(page))
}

/// List products by business line and price range
#[utoipa::path(
    get,
    path = "/businessline/{businessline}/price/{price}",
    tag = "Products",
    params(
        ("businessline" = String, Path, description = "Business line, matched case-insensitively"),
        ("price" = String, Path, description = "Inclusive range as `<low>-<high>`"),
        PageParams
    ),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_business_line_and_price<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    Path((business_line, price)): Path<(String, String)>,
    Query(params): Query<PageParams>,
) -> ProductResult<Json<ProductPage>> {
    let page = state
        .service
        .list_products(Some(&business_line), Some(&price), params.from.as_deref())
        .await?;
    Ok(Json(page))
}

/// Free-text search over name, business line, model and description
#[utoipa::path(
    get,
    path = "/search/{search}",
    tag = "Products",
    params(
        ("search" = String, Path, description = "Search term"),
        PageParams
    ),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    Path(term): Path<String>,
    Query(params): Query<PageParams>,
) -> ProductResult<Json<ProductPage>> {
    let page = state
        .service
        .search_products(&term, params.from.as_deref())
        .await?;
    Ok(Json(page))
}

/// Distinct business lines
#[utoipa::path(
    get,
    path = "/businesslinelist",
    tag = "Products",
    responses(
        (status = 200, description = "Sorted business lines", body = BusinessLines),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn business_line_list<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
) -> ProductResult<Json<BusinessLines>> {
    let business_lines = state.service.business_lines().await?;
    Ok(Json(BusinessLines { business_lines }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<Product>> {
    let product = state.service.get_product(id).await?;
    Ok(Json(product))
}

/// Create a product (admin)
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 200, description = "Product created", body = MutationResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn create_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    AdminUser(admin): AdminUser,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<Json<MutationResponse>> {
    let product = state.service.create_product(input).await?;
    tracing::info!(product_id = %product.id, admin = %admin.sub, "Product created");

    Ok(Json(MutationResponse {
        message: "Product created successfully".into(),
        product,
    }))
}

/// Partially update a product (admin)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Updated product", body = MutationResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn update_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    AdminUser(_admin): AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<MutationResponse>> {
    let product = state.service.update_product(id, input).await?;
    Ok(Json(MutationResponse {
        message: "Updated successfully".into(),
        product,
    }))
}

/// Delete a product (admin)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product", body = MutationResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn delete_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    AdminUser(_admin): AdminUser,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<MutationResponse>> {
    let product = state.service.delete_product(id).await?;
    Ok(Json(MutationResponse {
        message: "Element deleted successfully".into(),
        product,
    }))
}
