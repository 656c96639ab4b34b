use crate::handlers::clinic_api::ClinicApi;
use crate::handlers::guard::ensure_roles;
use crate::handlers::list_view::{Column, ListQuery, ListView};
use crate::models::all_models::{PatientRecord, Role};
use actix_web::{web, HttpRequest, HttpResponse, Responder};

const PATIENT_ROLES: &[Role] = &[Role::Admin, Role::Doctor, Role::Nurse, Role::Staff];

fn patient_list() -> ListView<PatientRecord> {
    ListView::new(vec![
        Column::new("display_name", "Patient"),
        Column::new("account", "Account"),
        Column::rendered("dob", "Date of Birth", |p: &PatientRecord| {
            p.dob.format("%Y-%m-%d").to_string()
        }),
        Column::new("phone", "Phone"),
        Column::new("assigned_doctor", "Assigned Doctor"),
    ])
}

//List Patients
//List Patients Input: Query(ListQuery)
//List Patients Output: ListPage
pub async fn list_patients(
    req: HttpRequest,
    api: web::Data<ClinicApi>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let session = match ensure_roles(&req, PATIENT_ROLES) {
        Ok(session) => session,
        Err(response) => return response,
    };

    match api.patients(&session.token).await {
        Ok(patients) => {
            HttpResponse::Ok().json(patient_list().render(&patients, &query.into_inner()))
        }
        Err(e) => e.to_response("Failed to load patients"),
    }
}

//Config Patient Routes
// GET /patients
pub fn config_patient_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/patients").route("", web::get().to(list_patients)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn absent_phone_and_doctor_render_empty() {
        let rows = vec![PatientRecord {
            patient_id: Uuid::new_v4(),
            account: "pmorrow".to_string(),
            display_name: "P. Morrow".to_string(),
            dob: NaiveDate::from_ymd_opt(1987, 11, 23).unwrap(),
            phone: None,
            assigned_doctor: None,
        }];

        let page = patient_list().render(&rows, &ListQuery::default());
        assert_eq!(page.rows[0][2], "1987-11-23");
        assert_eq!(page.rows[0][3], "");
        assert_eq!(page.rows[0][4], "");
    }
}
