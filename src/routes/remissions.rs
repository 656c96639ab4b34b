use crate::handlers::clinic_api::ClinicApi;
use crate::handlers::guard::ensure_roles;
use crate::handlers::list_view::{Column, ListQuery, ListView};
use crate::models::all_models::{Remission, Role};
use actix_web::{web, HttpRequest, HttpResponse, Responder};

const REMISSION_ROLES: &[Role] = &[Role::Admin, Role::HeadOfDepartment, Role::Doctor];

fn remission_list() -> ListView<Remission> {
    ListView::new(vec![
        Column::new("patient_name", "Patient"),
        Column::new("from_department", "From"),
        Column::new("to_department", "To"),
        Column::new("reason", "Reason"),
        Column::rendered("status", "Status", |r: &Remission| r.status.to_string()),
        Column::rendered("created_at", "Issued", |r: &Remission| {
            r.created_at.format("%Y-%m-%d").to_string()
        }),
    ])
}

//List Remissions
//List Remissions Input: Query(ListQuery)
//List Remissions Output: ListPage
pub async fn list_remissions(
    req: HttpRequest,
    api: web::Data<ClinicApi>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let session = match ensure_roles(&req, REMISSION_ROLES) {
        Ok(session) => session,
        Err(response) => return response,
    };

    match api.remissions(&session.token).await {
        Ok(remissions) => {
            HttpResponse::Ok().json(remission_list().render(&remissions, &query.into_inner()))
        }
        Err(e) => e.to_response("Failed to load remissions"),
    }
}

//My Remissions
//My Remissions Input: Query(ListQuery), patient session
//My Remissions Output: ListPage scoped to the logged-in patient
pub async fn my_remissions(
    req: HttpRequest,
    api: web::Data<ClinicApi>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let session = match ensure_roles(&req, &[Role::Patient]) {
        Ok(session) => session,
        Err(response) => return response,
    };

    match api
        .remissions_for_patient(session.user_id, &session.token)
        .await
    {
        Ok(remissions) => {
            HttpResponse::Ok().json(remission_list().render(&remissions, &query.into_inner()))
        }
        Err(e) => e.to_response("Failed to load your remissions"),
    }
}

//Config Remission Routes
// GET /remissions
// GET /remissions/mine
pub fn config_remission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/remissions")
            .route("", web::get().to(list_remissions))
            .route("/mine", web::get().to(my_remissions)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::all_models::RemissionStatus;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn remission_cells_render_status_and_issue_date() {
        let rows = vec![Remission {
            remission_id: Uuid::new_v4(),
            patient_name: "R. Ames".to_string(),
            from_department: "General".to_string(),
            to_department: "Cardiology".to_string(),
            reason: "Follow-up after abnormal ECG".to_string(),
            status: RemissionStatus::Pending,
            created_at: NaiveDate::from_ymd_opt(2024, 2, 8)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        }];

        let page = remission_list().render(&rows, &ListQuery::default());
        assert_eq!(page.rows[0][4], "pending");
        assert_eq!(page.rows[0][5], "2024-02-08");
    }
}
