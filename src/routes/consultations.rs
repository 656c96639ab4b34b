use crate::handlers::clinic_api::ClinicApi;
use crate::handlers::guard::ensure_roles;
use crate::handlers::list_view::{Column, ListQuery, ListView};
use crate::models::all_models::{Consultation, Role};
use actix_web::{web, HttpRequest, HttpResponse, Responder};

const CONSULTATION_ROLES: &[Role] = &[Role::Admin, Role::HeadOfDepartment, Role::Doctor];

fn consultation_list() -> ListView<Consultation> {
    ListView::new(vec![
        Column::new("patient_name", "Patient"),
        Column::new("doctor_name", "Doctor"),
        Column::new("department_name", "Department"),
        Column::rendered("scheduled_at", "Scheduled", |c: &Consultation| {
            c.scheduled_at.format("%Y-%m-%d %H:%M").to_string()
        }),
        Column::rendered("status", "Status", |c: &Consultation| c.status.to_string()),
        Column::new("notes", "Notes"),
    ])
}

//List Consultations
//List Consultations Input: Query(ListQuery)
//List Consultations Output: ListPage
pub async fn list_consultations(
    req: HttpRequest,
    api: web::Data<ClinicApi>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let session = match ensure_roles(&req, CONSULTATION_ROLES) {
        Ok(session) => session,
        Err(response) => return response,
    };

    match api.consultations(&session.token).await {
        Ok(consultations) => {
            HttpResponse::Ok().json(consultation_list().render(&consultations, &query.into_inner()))
        }
        Err(e) => e.to_response("Failed to load consultations"),
    }
}

//My Consultations
//My Consultations Input: Query(ListQuery), patient session
//My Consultations Output: ListPage scoped to the logged-in patient
pub async fn my_consultations(
    req: HttpRequest,
    api: web::Data<ClinicApi>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let session = match ensure_roles(&req, &[Role::Patient]) {
        Ok(session) => session,
        Err(response) => return response,
    };

    match api
        .consultations_for_patient(session.user_id, &session.token)
        .await
    {
        Ok(consultations) => {
            HttpResponse::Ok().json(consultation_list().render(&consultations, &query.into_inner()))
        }
        Err(e) => e.to_response("Failed to load your consultations"),
    }
}

//Config Consultation Routes
// GET /consultations
// GET /consultations/mine
pub fn config_consultation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/consultations")
            .route("", web::get().to(list_consultations))
            .route("/mine", web::get().to(my_consultations)),
    );
}
