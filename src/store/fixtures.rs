//! Demo fleet used when no printer backend is configured.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use crate::types::{
    Alert, AlertKind, Analytics, CurrentParameters, HealthSnapshot, MaintenanceKind,
    MaintenanceRecord, MaintenanceStatus, Printer, PrinterStatus, Priority, TimeRange,
};

pub(super) fn printers(now: DateTime<Utc>) -> Vec<Printer> {
    vec![
        Printer {
            id: "printer-001".to_string(),
            name: "Printer 1".to_string(),
            model: "Ender 3 Pro".to_string(),
            manufacturer: Some("Creality".to_string()),
            last_maintenance: now - Duration::days(7),
            total_print_hours: 256.0,
            status: PrinterStatus::Operational,
            current_parameters: Some(CurrentParameters {
                material: "PLA".to_string(),
                temperature: 200.0,
                print_speed: 60.0,
            }),
        },
        Printer {
            id: "printer-002".to_string(),
            name: "Printer 2".to_string(),
            model: "Prusa i3 MK3S+".to_string(),
            manufacturer: Some("Prusa Research".to_string()),
            last_maintenance: now - Duration::days(14),
            total_print_hours: 432.0,
            status: PrinterStatus::Operational,
            current_parameters: Some(CurrentParameters {
                material: "PETG".to_string(),
                temperature: 240.0,
                print_speed: 45.0,
            }),
        },
        Printer {
            id: "printer-003".to_string(),
            name: "Printer 3".to_string(),
            model: "Ultimaker S5".to_string(),
            manufacturer: Some("UltiMaker".to_string()),
            last_maintenance: now - Duration::days(3),
            total_print_hours: 128.0,
            status: PrinterStatus::Maintenance,
            current_parameters: Some(CurrentParameters {
                material: "ABS".to_string(),
                temperature: 245.0,
                print_speed: 50.0,
            }),
        },
    ]
}

fn snapshot(overall: f64, components: [(&str, f64); 4], wear: f64, thermal: f64) -> HealthSnapshot {
    HealthSnapshot {
        overall_score: overall,
        components: components
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
        wear_factor: wear,
        thermal_stress: thermal,
    }
}

/// Health snapshot for one of the demo printers; new printers start healthy.
pub(super) fn health(printer_id: &str) -> HealthSnapshot {
    match printer_id {
        "printer-001" => snapshot(
            88.0,
            [("bed", 92.0), ("extruder", 85.0), ("motors", 90.0), ("nozzle", 78.0)],
            0.22,
            0.18,
        ),
        "printer-002" => snapshot(
            72.0,
            [("bed", 81.0), ("extruder", 64.0), ("motors", 75.0), ("nozzle", 68.0)],
            0.41,
            0.35,
        ),
        "printer-003" => snapshot(
            54.0,
            [("bed", 70.0), ("extruder", 45.0), ("motors", 58.0), ("nozzle", 49.0)],
            0.67,
            0.52,
        ),
        _ => snapshot(
            100.0,
            [("bed", 100.0), ("extruder", 100.0), ("motors", 100.0), ("nozzle", 100.0)],
            0.0,
            0.0,
        ),
    }
}

pub(super) fn alerts() -> Vec<Alert> {
    vec![
        Alert {
            kind: AlertKind::Warning,
            component: "Nozzle".to_string(),
            message: "Nozzle wear detected".to_string(),
            priority: Priority::High,
            maintenance_items: Some(vec![
                "Clean nozzle".to_string(),
                "Check for wear".to_string(),
            ]),
        },
        Alert {
            kind: AlertKind::Critical,
            component: "Extruder".to_string(),
            message: "Extruder skipping detected".to_string(),
            priority: Priority::Critical,
            maintenance_items: Some(vec![
                "Check extruder tension".to_string(),
                "Clean extruder gear".to_string(),
            ]),
        },
    ]
}

pub(super) fn maintenance_history(printer_id: &str, now: DateTime<Utc>) -> Vec<MaintenanceRecord> {
    vec![
        MaintenanceRecord {
            id: format!("{printer_id}-maint-001"),
            printer_id: printer_id.to_string(),
            date: (now - Duration::days(7)).to_rfc3339(),
            kind: MaintenanceKind::Routine,
            description: "Regular maintenance check".to_string(),
            technician: "John Doe".to_string(),
            status: MaintenanceStatus::Completed,
        },
        MaintenanceRecord {
            id: format!("{printer_id}-maint-002"),
            printer_id: printer_id.to_string(),
            date: (now + Duration::days(7)).to_rfc3339(),
            kind: MaintenanceKind::Preventive,
            description: "Scheduled nozzle replacement".to_string(),
            technician: "Jane Smith".to_string(),
            status: MaintenanceStatus::Scheduled,
        },
    ]
}

/// Weekly baseline scaled to the requested range.
pub(super) fn analytics(range: TimeRange) -> Analytics {
    let weeks = match range {
        TimeRange::Day => 1.0 / 7.0,
        TimeRange::Week => 1.0,
        TimeRange::Month => 4.0,
        TimeRange::Year => 52.0,
    };
    Analytics {
        maintenance_costs: 250.0 * weeks,
        downtime_costs: 150.0 * weeks,
        savings_from_predictive: 400.0 * weeks,
        predicted_issues: scaled_count(5.0, weeks),
        prevented_issues: scaled_count(3.0, weeks),
        uptime: 0.95,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_count(per_week: f64, weeks: f64) -> u32 {
    (per_week * weeks).round() as u32
}
