//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the health probes through `#[utoipa::path]` and adds
//! the collection endpoints programmatically, since they are served by
//! generic handlers. Domain types are described by the wrappers in
//! [`crate::inbound::http::schemas`].
//!
//! The document backs Swagger UI (debug builds) and `openapi-dump`.

use utoipa::openapi::path::{
    HttpMethod, Operation, OperationBuilder, ParameterBuilder, ParameterIn, PathItem,
};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::response::ResponseBuilder;
use utoipa::openapi::schema::{
    Array, KnownFormat, ObjectBuilder, Schema, SchemaFormat, SchemaType, Type,
};
use utoipa::openapi::{ContentBuilder, Ref, RefOr, Required, Response};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::domain::ports::Entity;
use crate::domain::{Article, Category, User};
use crate::inbound::http::articles::ArticlePayload;
use crate::inbound::http::categories::CategoryPayload;
use crate::inbound::http::resource::{API_BASE, HttpResource};
use crate::inbound::http::schemas::{
    ArticleSchema, ArticleTypeSchema, CategorySchema, ErrorCodeSchema, ErrorSchema, UserSchema,
};
use crate::inbound::http::users::UserPayload;

fn schema_ref<S: ToSchema>() -> Ref {
    Ref::from_schema_name(S::name())
}

fn json_response(description: &str, schema: Option<Schema>) -> RefOr<Response> {
    let mut builder = ResponseBuilder::new().description(description);
    if let Some(schema) = schema {
        builder = builder.content(
            "application/json",
            ContentBuilder::new().schema(Some(schema)).build(),
        );
    }
    RefOr::T(builder.build())
}

fn ref_response(description: &str, reference: Ref) -> RefOr<Response> {
    RefOr::T(
        ResponseBuilder::new()
            .description(description)
            .content(
                "application/json",
                ContentBuilder::new().schema(Some(reference)).build(),
            )
            .build(),
    )
}

/// Operations on one collection, keyed by its two paths.
struct CollectionDoc {
    collection: &'static str,
    singular: &'static str,
    record: fn() -> Ref,
    payload: fn() -> Ref,
}

impl CollectionDoc {
    fn of<R, S, P>() -> Self
    where
        R: HttpResource,
        S: ToSchema,
        P: ToSchema,
    {
        Self {
            collection: R::COLLECTION,
            singular: <R as Entity>::NAME,
            record: schema_ref::<S>,
            payload: schema_ref::<P>,
        }
    }

    fn error_response(description: &str) -> RefOr<Response> {
        ref_response(description, schema_ref::<ErrorSchema>())
    }

    fn base(&self, operation_id: String, summary: String) -> OperationBuilder {
        OperationBuilder::new()
            .tag(self.collection)
            .operation_id(Some(operation_id))
            .summary(Some(summary))
            .response(
                "503",
                Self::error_response("Persistence store unavailable"),
            )
    }

    fn with_id(&self, builder: OperationBuilder) -> OperationBuilder {
        let id_schema = ObjectBuilder::new()
            .schema_type(SchemaType::Type(Type::Integer))
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::Int64)))
            .build();
        builder
            .parameter(
                ParameterBuilder::new()
                    .name("id")
                    .parameter_in(ParameterIn::Path)
                    .required(Required::True)
                    .schema(Some(Schema::Object(id_schema)))
                    .description(Some(format!("{} identifier", self.singular)))
                    .build(),
            )
            .response("404", Self::error_response("Not found"))
    }

    fn with_body(&self, builder: OperationBuilder) -> OperationBuilder {
        builder
            .request_body(Some(
                RequestBodyBuilder::new()
                    .content(
                        "application/json",
                        ContentBuilder::new().schema(Some((self.payload)())).build(),
                    )
                    .required(Some(Required::True))
                    .build(),
            ))
            .response("400", Self::error_response("Invalid request"))
    }

    fn list(&self) -> Operation {
        let items = Schema::Array(Array::new((self.record)()));
        self.base(
            format!("list_{}", self.collection),
            format!("List {}", self.collection),
        )
        .response("200", json_response("Every record, ordered by id", Some(items)))
        .build()
    }

    fn create(&self) -> Operation {
        let builder = self
            .base(
                format!("create_{}", self.singular),
                format!("Create a {}", self.singular),
            )
            .response("201", ref_response("Created record", (self.record)()));
        self.with_body(builder).build()
    }

    fn fetch(&self) -> Operation {
        let builder = self
            .base(
                format!("fetch_{}", self.singular),
                format!("Fetch a {}", self.singular),
            )
            .response("200", ref_response("Stored record", (self.record)()));
        self.with_id(builder).build()
    }

    fn replace(&self) -> Operation {
        let builder = self
            .base(
                format!("replace_{}", self.singular),
                format!("Replace a {}", self.singular),
            )
            .response("200", ref_response("Updated record", (self.record)()));
        self.with_body(self.with_id(builder)).build()
    }

    fn partial_update(&self) -> Operation {
        let builder = self
            .base(
                format!("partial_update_{}", self.singular),
                format!("Update some fields of a {}", self.singular),
            )
            .response("200", ref_response("Updated record", (self.record)()));
        self.with_body(self.with_id(builder)).build()
    }

    fn delete(&self) -> Operation {
        let builder = self
            .base(
                format!("delete_{}", self.singular),
                format!("Delete a {}", self.singular),
            )
            .response("204", json_response("Deleted", None));
        self.with_id(builder).build()
    }

    fn register(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let collection_path = format!("{API_BASE}/{}", self.collection);
        let detail_path = format!("{collection_path}/{{id}}");

        let mut collection_item = PathItem::new(HttpMethod::Get, self.list());
        collection_item.post = Some(self.create());

        let mut detail_item = PathItem::new(HttpMethod::Get, self.fetch());
        detail_item.put = Some(self.replace());
        detail_item.patch = Some(self.partial_update());
        detail_item.delete = Some(self.delete());

        openapi.paths.paths.insert(collection_path, collection_item);
        openapi.paths.paths.insert(detail_path, detail_item);
    }
}

/// Adds the generic collection endpoints to the document.
struct CollectionsAddon;

impl Modify for CollectionsAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        for collection in [
            CollectionDoc::of::<User, UserSchema, UserPayload>(),
            CollectionDoc::of::<Category, CategorySchema, CategoryPayload>(),
            CollectionDoc::of::<Article, ArticleSchema, ArticlePayload>(),
        ] {
            collection.register(openapi);
        }
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&CollectionsAddon),
    info(
        title = "Blog backend API",
        description = "CRUD access to users, categories and articles, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        CategorySchema,
        ArticleSchema,
        ArticleTypeSchema,
        UserPayload,
        CategoryPayload,
        ArticlePayload,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "Blog authors"),
        (name = "categories", description = "Article categories"),
        (name = "articles", description = "Articles with expanded author and categories"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
