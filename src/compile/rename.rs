use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::schema::{Column, NormalizedRow};

/// Entity value used before the reorganisation for rows whose real entity
/// sits one level down.
pub const EXECUTIVE_BRANCH: &str = "Poder Ejecutivo";

/// Historical department names and the name currently in use. Targets are
/// never keys, so renaming is idempotent.
static DEPARTMENT_RENAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Instituto Federal Electoral", "Instituto Nacional Electoral"),
        (
            "Comunicaciones y Transportes",
            "Infraestructura, Comunicaciones y Transportes",
        ),
        (
            "Procuraduría General de la República",
            "Fiscalía General de la República",
        ),
        (
            "Procuraduría General de la República (Ahora Fiscalía General de la República)",
            "Fiscalía General de la República",
        ),
        (
            "Procuraduría General de la República (ahora Fiscalía General de la República)",
            "Fiscalía General de la República",
        ),
        (
            "Agricultura, Ganadería, Desarrollo Rural, Pesca y Alimentación",
            "Agricultura y Desarrollo Rural",
        ),
        (
            "Agricultura, Ganadería, Desarrollo Rural, Pesca y Alimentación (Ahora Agricultura y Desarrollo Rural)",
            "Agricultura y Desarrollo Rural",
        ),
        ("Desarrollo Social", "Bienestar"),
        ("Desarrollo Social (Ahora Bienestar)", "Bienestar"),
        (
            "Instituto Nacional de Estadística y Geografía",
            "Información Nacional Estadística y Geográfica",
        ),
    ])
});

/// Current name of a department; unknown names pass through unchanged.
pub fn rename(department: &str) -> &str {
    DEPARTMENT_RENAMES.get(department).copied().unwrap_or(department)
}

/// Apply [`rename`] to the row's department in place.
pub fn rename_department(row: &mut NormalizedRow) -> bool {
    let Some(current) = row.department() else {
        return false;
    };
    let renamed = rename(current);
    if renamed == current {
        return false;
    }
    let renamed = renamed.to_string();
    row.set(Column::Department, renamed);
    true
}

/// Rows filed under the executive-branch placeholder move one level up:
/// the department becomes the entity and the sub-department the department.
pub fn relocate_executive_branch(row: &mut NormalizedRow) -> bool {
    if row.entity() != Some(EXECUTIVE_BRANCH) {
        return false;
    }
    let department = row.take(Column::Department);
    let sub_department = row.take(Column::SubDepartment);
    row.put(Column::Entity, department);
    row.put(Column::Department, sub_department);
    true
}
