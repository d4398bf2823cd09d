use axum::{extract::State, response::Html, routing::get, Router};
use crate::controllers::vehicle_controller::VehicleController;
use crate::models::vehicle::VehicleRecord;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::html::escape_html;

const INDEX_PAGE: &str = include_str!("../web/index.html");
const SCAN_PAGE: &str = include_str!("../web/scan.html");
const VEHICLES_TEMPLATE: &str = include_str!("../web/vehiculos.html");

pub fn create_page_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/scan", get(scan))
        .route("/vehiculos", get(vehicles_page))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn scan() -> Html<&'static str> {
    Html(SCAN_PAGE)
}

async fn vehicles_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let controller = VehicleController::new(state.pool.clone());
    let vehicles = controller.list_records().await?;
    Ok(Html(render_vehicles_page(&vehicles)))
}

/// Rellenar la plantilla del listado con una fila por vehículo
pub fn render_vehicles_page(vehicles: &[VehicleRecord]) -> String {
    let rows = if vehicles.is_empty() {
        r#"<tr><td colspan="7" class="vacio">No hay vehículos registrados</td></tr>"#.to_string()
    } else {
        vehicles.iter().map(render_row).collect::<Vec<_>>().join("\n")
    };

    VEHICLES_TEMPLATE
        .replace("{{total}}", &vehicles.len().to_string())
        .replace("{{filas}}", &rows)
}

fn render_row(v: &VehicleRecord) -> String {
    format!(
        "<tr><td class=\"patente\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><span class=\"estado\">{}</span></td></tr>",
        escape_html(&v.patente),
        escape_html(&v.duenio),
        escape_html(&v.vehiculo),
        escape_html(&v.falla),
        escape_html(&v.email),
        v.fecha_ingreso.format("%d/%m/%Y %H:%M"),
        escape_html(&v.estado),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn vehicle(patente: &str, duenio: &str) -> VehicleRecord {
        VehicleRecord {
            id: 1,
            patente: patente.into(),
            duenio: duenio.into(),
            vehiculo: "Ford Ka".into(),
            falla: "Aceite".into(),
            email: "x@example.com".into(),
            fecha_ingreso: Utc.with_ymd_and_hms(2024, 5, 2, 14, 30, 0).unwrap(),
            estado: "En taller".into(),
        }
    }

    #[test]
    fn test_render_escapes_user_content() {
        let html = render_vehicles_page(&[vehicle("AB123CD", "<script>alert(1)</script>")]);
        assert!(html.contains("AB123CD"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("02/05/2024 14:30"));
        assert!(!html.contains("{{filas}}"));
    }

    #[test]
    fn test_render_empty_list() {
        let html = render_vehicles_page(&[]);
        assert!(html.contains("No hay vehículos registrados"));
        assert!(!html.contains("{{total}}"));
    }
}
