use crate::handlers::clinic_api::ClinicApi;
use crate::handlers::guard::ensure_roles;
use crate::handlers::list_view::{Column, ListQuery, ListView};
use crate::models::all_models::{Department, Role, StockItem};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use uuid::Uuid;

const DEPARTMENT_ROLES: &[Role] = &[Role::Admin, Role::HeadOfDepartment, Role::Staff];
const STOCK_ROLES: &[Role] = &[Role::Admin, Role::HeadOfDepartment, Role::Nurse];

fn department_list() -> ListView<Department> {
    ListView::new(vec![
        Column::new("name", "Department"),
        Column::new("description", "Description"),
        Column::new("head_name", "Head"),
        Column::rendered("created_at", "Created", |d: &Department| {
            d.created_at.format("%Y-%m-%d").to_string()
        }),
    ])
}

fn stock_list() -> ListView<StockItem> {
    ListView::new(vec![
        Column::new("medication_name", "Medication"),
        Column::rendered("quantity", "Quantity", |item: &StockItem| {
            format!("{} {}", item.quantity, item.unit)
        }),
        Column::rendered("below_threshold", "Level", |item: &StockItem| {
            if item.below_threshold { "Low" } else { "OK" }.to_string()
        }),
        Column::rendered("updated_at", "Updated", |item: &StockItem| {
            item.updated_at.format("%Y-%m-%d %H:%M").to_string()
        }),
    ])
}

//List Departments
//List Departments Input: Query(ListQuery)
//List Departments Output: ListPage
pub async fn list_departments(
    req: HttpRequest,
    api: web::Data<ClinicApi>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let session = match ensure_roles(&req, DEPARTMENT_ROLES) {
        Ok(session) => session,
        Err(response) => return response,
    };

    match api.departments(&session.token).await {
        Ok(departments) => {
            HttpResponse::Ok().json(department_list().render(&departments, &query.into_inner()))
        }
        Err(e) => e.to_response("Failed to load departments"),
    }
}

//Department Stock
//Department Stock Input: Path(department_id), Query(ListQuery)
//Department Stock Output: ListPage
pub async fn department_stock(
    req: HttpRequest,
    api: web::Data<ClinicApi>,
    path: web::Path<Uuid>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let session = match ensure_roles(&req, STOCK_ROLES) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let department_id = path.into_inner();

    match api.department_stock(department_id, &session.token).await {
        Ok(stock) => HttpResponse::Ok().json(stock_list().render(&stock, &query.into_inner())),
        Err(e) => e.to_response("Failed to load medication stock"),
    }
}

//Config Department Routes
// GET /departments
// GET /departments/{department_id}/stock
pub fn config_department_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/departments")
            .route("", web::get().to(list_departments))
            .route("/{department_id}/stock", web::get().to(department_stock)),
    );
}
