use crate::handlers::clinic_api::ClinicApi;
use crate::handlers::guard::ensure_roles;
use crate::handlers::list_view::{Column, ListQuery, ListView};
use crate::models::all_models::{Role, Worker};
use actix_web::{web, HttpRequest, HttpResponse, Responder};

const WORKER_ROLES: &[Role] = &[Role::Admin, Role::HeadOfDepartment];

fn worker_list() -> ListView<Worker> {
    ListView::new(vec![
        Column::new("display_name", "Name"),
        Column::new("account", "Account"),
        Column::rendered("role", "Role", |w: &Worker| w.role.to_string()),
        Column::new("department_name", "Department"),
        Column::new("email", "Email"),
        Column::rendered("active", "Status", |w: &Worker| {
            if w.active { "Active" } else { "Inactive" }.to_string()
        }),
    ])
}

//List Workers
//List Workers Input: Query(ListQuery)
//List Workers Output: ListPage
pub async fn list_workers(
    req: HttpRequest,
    api: web::Data<ClinicApi>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let session = match ensure_roles(&req, WORKER_ROLES) {
        Ok(session) => session,
        Err(response) => return response,
    };

    match api.workers(&session.token).await {
        Ok(workers) => HttpResponse::Ok().json(worker_list().render(&workers, &query.into_inner())),
        Err(e) => e.to_response("Failed to load workers"),
    }
}

//Config Worker Routes
// GET /workers
pub fn config_worker_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/workers").route("", web::get().to(list_workers)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn worker(name: &str, role: Role, active: bool) -> Worker {
        Worker {
            worker_id: Uuid::new_v4(),
            account: name.to_lowercase(),
            display_name: name.to_string(),
            role,
            department_name: Some("Cardiology".to_string()),
            email: format!("{}@clinic.example", name.to_lowercase()),
            active,
        }
    }

    #[test]
    fn worker_cells_render_role_and_status() {
        let rows = vec![worker("Imani", Role::Doctor, true), worker("Sasha", Role::Nurse, false)];
        let page = worker_list().render(&rows, &ListQuery::default());

        assert_eq!(page.rows[0][2], "doctor");
        assert_eq!(page.rows[0][5], "Active");
        assert_eq!(page.rows[1][5], "Inactive");
    }

    #[test]
    fn worker_search_spans_email_addresses() {
        let rows = vec![worker("Imani", Role::Doctor, true), worker("Sasha", Role::Nurse, true)];
        let page = worker_list().render(
            &rows,
            &ListQuery {
                search: Some("SASHA@".to_string()),
                page: None,
            },
        );

        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0][0], "Sasha");
    }
}
