use rust_decimal::Decimal;

use super::common::*;
use crate::access::Capability;
use crate::domain::{
    DirectionOfChange, IndicatorType, InitiativeReport, RecordId, ResourceItemPlan,
    ResourceItemReport, ResourceType, StatementDraft, StrategicActionPlanDraft, SwotAnalysis,
    SwotReport, SwotType,
};
use crate::repository::MemoryStore;
use crate::service::{AccessDenied, ServiceError, StrategyService};

fn assert_not_found<T: std::fmt::Debug>(result: Result<T, ServiceError>) {
    match result {
        Err(ServiceError::NotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

fn assert_rejected_on<T: std::fmt::Debug>(result: Result<T, ServiceError>, field: &str) {
    match result {
        Err(ServiceError::Validation(errors)) => assert!(errors.has(field), "{errors:?}"),
        other => panic!("expected {field} to be rejected, got {other:?}"),
    }
}

fn statement(text: &str) -> StatementDraft {
    StatementDraft {
        statement: text.to_string(),
    }
}

#[test]
fn stakeholders_are_invisible_across_tenants() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
    let nile = register(&service, "Blue Nile", "abel@nile.org");
    let today = date(2025, 9, 1);

    let row = service
        .create_stakeholder(&acme.editor, stakeholder_draft("Ministry", "high", "high", "medium", "high"))
        .expect("stakeholder saves");
    assert_eq!(row.organization_id, acme.id());

    assert_not_found(service.stakeholder(&nile.editor, row.id, today));
    assert_not_found(service.update_stakeholder(
        &nile.editor,
        row.id,
        stakeholder_draft("Hijack", "low", "low", "low", "low"),
    ));
    assert_not_found(service.delete_stakeholder(&nile.editor, row.id));
    assert!(service.stakeholders(&nile.editor, today).expect("list").is_empty());

    let still_there = service.stakeholder(&acme.viewer, row.id, today).expect("owner reads");
    assert_eq!(still_there.stakeholder.record.profile.name, "Ministry");
}

#[test]
fn strategy_records_are_invisible_across_tenants() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
    let nile = register(&service, "Blue Nile", "abel@nile.org");

    let hierarchy = service
        .create_hierarchy(&acme.editor, revenue_kpi())
        .expect("hierarchy saves")
        .row;
    let cycle = service.create_cycle(&acme.editor, cycle_draft()).expect("cycle saves");
    let plan = service
        .create_action_plan(
            &acme.editor,
            StrategicActionPlanDraft {
                cycle_id: cycle.id,
                hierarchy_id: hierarchy.id,
                indicator_type: IndicatorType::Lagg,
                direction_of_change: DirectionOfChange::Increasing,
                baseline: Decimal::from(10),
                target: Decimal::from(20),
                weight: Decimal::from(50),
                status: "pending".to_string(),
            },
        )
        .expect("plan saves");
    let report = service
        .create_strategic_report(&acme.editor, report_draft(plan.id, 15))
        .expect("report saves");
    let swot = service
        .create_swot(
            &acme.editor,
            SwotAnalysis {
                swot_type: SwotType::Strength,
                pillar: "Leadership & Governance".to_string(),
                factor: "Effective board oversight".to_string(),
                priority: "High".to_string(),
                impact: "Medium".to_string(),
                likelihood: None,
                description: None,
            },
        )
        .expect("swot saves")
        .row;

    assert_not_found(service.hierarchy(&nile.editor, hierarchy.id));
    assert_not_found(service.cycle(&nile.editor, cycle.id));
    assert_not_found(service.action_plan(&nile.editor, plan.id));
    assert_not_found(service.strategic_report(&nile.editor, report.id));
    assert_not_found(service.swot(&nile.editor, swot.id));
    assert_not_found(service.delete_cycle(&nile.editor, cycle.id));
    assert_not_found(service.update_hierarchy(&nile.editor, hierarchy.id, revenue_kpi()));

    assert!(service.hierarchies(&nile.editor).expect("list").is_empty());
    assert!(service.cycles(&nile.editor).expect("list").is_empty());
    assert!(service.action_plans(&nile.editor).expect("list").is_empty());
    assert!(service.strategic_reports(&nile.editor).expect("list").is_empty());
    assert!(service.swot_analyses(&nile.editor).expect("list").is_empty());

    // Children cannot be hung off another tenant's parents either.
    assert_not_found(service.create_strategic_report(&nile.editor, report_draft(plan.id, 12)));
    assert_not_found(service.create_risk(&nile.editor, risk_draft(cycle.id)));
}

#[test]
fn initiative_records_and_risks_are_invisible_across_tenants() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
    let nile = register(&service, "Blue Nile", "abel@nile.org");
    let today = date(2025, 9, 1);

    let plan = service
        .create_initiative(&acme.editor, initiative(1000, 40))
        .expect("initiative saves")
        .row;
    let report = service
        .create_initiative_report(
            &acme.editor,
            InitiativeReport {
                initiative_id: plan.id,
                total_budget_spent: Decimal::from(250),
                total_actual_hr: Decimal::from(10),
                achieved_status: "Medium".to_string(),
                notes: String::new(),
            },
        )
        .expect("report saves");
    let resource = service
        .create_resource_plan(
            &acme.editor,
            ResourceItemPlan {
                initiative_id: plan.id,
                resource_type: ResourceType::Equipment,
                resource_name: "Ultrasound".to_string(),
                resource_required: Decimal::from(2),
            },
        )
        .expect("resource plan saves");
    let usage = service
        .create_resource_report(
            &acme.editor,
            ResourceItemReport {
                plan_id: resource.id,
                resource_used: Decimal::ONE,
                notes: String::new(),
            },
        )
        .expect("resource report saves");
    let cycle = service.create_cycle(&acme.editor, cycle_draft()).expect("cycle saves");
    let risk = service
        .create_risk(&acme.editor, risk_draft(cycle.id))
        .expect("risk saves")
        .row;

    assert_not_found(service.initiative(&nile.editor, plan.id));
    assert_not_found(service.initiative_report(&nile.editor, report.id, today));
    assert_not_found(service.resource_plan(&nile.editor, resource.id));
    assert_not_found(service.resource_report(&nile.editor, usage.id));
    assert_not_found(service.risk(&nile.editor, risk.id));
    assert_not_found(service.delete_risk(&nile.editor, risk.id));

    assert!(service.initiatives(&nile.editor).expect("list").is_empty());
    assert!(service.initiative_reports(&nile.editor, today).expect("list").is_empty());
    assert!(service.resource_plans(&nile.editor).expect("list").is_empty());
    assert!(service.resource_reports(&nile.editor).expect("list").is_empty());
    assert!(service.risks(&nile.editor).expect("list").is_empty());

    assert_eq!(service.risks(&acme.viewer).expect("list").len(), 1);
}

#[test]
fn vision_and_mission_follow_capabilities_and_tenancy() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
    let nile = register(&service, "Blue Nile", "abel@nile.org");

    let vision = service
        .create_vision(&acme.editor, statement("Healthy communities"))
        .expect("editor creates vision");
    service
        .create_mission(&acme.editor, statement("Deliver primary care"))
        .expect("editor creates mission");

    match service.create_vision(&acme.viewer, statement("Viewer vision")) {
        Err(ServiceError::Forbidden(AccessDenied::MissingCapability(Capability::VisionCreate))) => {}
        other => panic!("viewer must not create visions, got {other:?}"),
    }
    assert_eq!(service.visions(&acme.viewer).expect("viewer reads").len(), 1);
    assert_eq!(service.missions(&acme.viewer).expect("viewer reads").len(), 1);

    assert!(service.visions(&nile.editor).expect("list").is_empty());
    assert_not_found(service.update_vision(&nile.editor, vision.id, statement("Taken over")));
    assert_not_found(service.delete_vision(&nile.editor, vision.id));

    let root = superuser(&service);
    assert_eq!(service.visions(&root).expect("superuser lists").len(), 1);
    let renamed = service
        .update_vision(&root, vision.id, statement("Healthy, resilient communities"))
        .expect("superuser edits any tenant");
    assert_eq!(renamed.organization_id, acme.id());
}

#[test]
fn superuser_sees_every_tenant() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
    let nile = register(&service, "Blue Nile", "abel@nile.org");
    let today = date(2025, 9, 1);

    for (tenant, name) in [(&acme, "Ministry"), (&nile, "Donor")] {
        service
            .create_stakeholder(&tenant.editor, stakeholder_draft(name, "medium", "low", "low", "low"))
            .expect("stakeholder saves");
    }

    let root = superuser(&service);
    let everyone = service.stakeholders(&root, today).expect("superuser lists");
    assert_eq!(everyone.len(), 2);
    assert_eq!(service.stakeholders(&acme.editor, today).expect("list").len(), 1);
}

#[test]
fn callers_without_an_organization_are_forbidden() {
    let service = memory_service();
    let orphan = service
        .resolve_access(identity("drifter@example.org", None, Some("editor")))
        .expect("context resolves");
    let today = date(2025, 9, 1);

    assert!(matches!(
        service.stakeholders(&orphan, today),
        Err(ServiceError::Forbidden(AccessDenied::NoOrganization))
    ));
    assert!(matches!(
        service.create_stakeholder(&orphan, stakeholder_draft("X", "low", "low", "low", "low")),
        Err(ServiceError::Forbidden(AccessDenied::NoOrganization))
    ));
    assert!(matches!(
        service.create_vision(&orphan, statement("Nowhere")),
        Err(ServiceError::Forbidden(AccessDenied::NoOrganization))
    ));
}

/// Parents a tenant's child records hang off.
struct Parents {
    cycle: RecordId,
    hierarchy: RecordId,
    plan: RecordId,
    report: RecordId,
    initiative: RecordId,
    resource: RecordId,
}

fn parents(service: &StrategyService<MemoryStore>, tenant: &Tenant) -> Parents {
    let hierarchy = service
        .create_hierarchy(&tenant.editor, revenue_kpi())
        .expect("hierarchy saves")
        .row
        .id;
    let cycle = service.create_cycle(&tenant.editor, cycle_draft()).expect("cycle saves").id;
    let plan = service
        .create_action_plan(&tenant.editor, plan_draft(cycle, hierarchy, 100))
        .expect("plan saves")
        .id;
    let report = service
        .create_strategic_report(&tenant.editor, report_draft(plan, 15))
        .expect("report saves")
        .id;
    let initiative = service
        .create_initiative(&tenant.editor, initiative(1000, 40))
        .expect("initiative saves")
        .row
        .id;
    let resource = service
        .create_resource_plan(&tenant.editor, resource_plan(initiative))
        .expect("resource plan saves")
        .id;
    Parents {
        cycle,
        hierarchy,
        plan,
        report,
        initiative,
        resource,
    }
}

fn resource_plan(initiative_id: RecordId) -> ResourceItemPlan {
    ResourceItemPlan {
        initiative_id,
        resource_type: ResourceType::Budget,
        resource_name: "Operating budget".to_string(),
        resource_required: Decimal::from(500),
    }
}

fn initiative_report(initiative_id: RecordId) -> InitiativeReport {
    InitiativeReport {
        initiative_id,
        total_budget_spent: Decimal::from(250),
        total_actual_hr: Decimal::from(10),
        achieved_status: "Medium".to_string(),
        notes: String::new(),
    }
}

#[test]
fn children_cannot_be_moved_under_another_tenants_parent() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
    let nile = register(&service, "Blue Nile", "abel@nile.org");
    let ours = parents(&service, &acme);
    let theirs = parents(&service, &nile);
    let root = superuser(&service);
    let today = date(2025, 9, 1);

    let risk = service
        .create_risk(&acme.editor, risk_draft(ours.cycle))
        .expect("risk saves")
        .row;
    let progress = service
        .create_initiative_report(&acme.editor, initiative_report(ours.initiative))
        .expect("initiative report saves");
    let usage = service
        .create_resource_report(
            &acme.editor,
            ResourceItemReport {
                plan_id: ours.resource,
                resource_used: Decimal::from(120),
                notes: String::new(),
            },
        )
        .expect("usage saves");
    let swot = service
        .create_swot_report(
            &acme.editor,
            SwotReport {
                strategic_report_id: ours.report,
                analysis: swot_entry(SwotType::Strength, "Effective board oversight", "High"),
            },
        )
        .expect("swot report saves")
        .row;

    assert_rejected_on(
        service.update_action_plan(&root, ours.plan, plan_draft(theirs.cycle, theirs.hierarchy, 100)),
        "cycle_id",
    );
    assert_rejected_on(
        service.update_strategic_report(&root, ours.report, report_draft(theirs.plan, 30)),
        "action_plan_id",
    );
    assert_rejected_on(service.update_risk(&root, risk.id, risk_draft(theirs.cycle)), "cycle_id");
    assert_rejected_on(
        service.update_initiative_report(&root, progress.id, initiative_report(theirs.initiative)),
        "initiative_id",
    );
    assert_rejected_on(
        service.update_resource_plan(&root, ours.resource, resource_plan(theirs.initiative)),
        "initiative_id",
    );
    assert_rejected_on(
        service.update_resource_report(
            &root,
            usage.id,
            ResourceItemReport {
                plan_id: theirs.resource,
                resource_used: Decimal::from(120),
                notes: String::new(),
            },
        ),
        "plan_id",
    );
    assert_rejected_on(
        service.update_swot_report(
            &root,
            swot.id,
            SwotReport {
                strategic_report_id: theirs.report,
                analysis: swot.record.analysis.clone(),
            },
        ),
        "strategic_report_id",
    );

    let plan = service.action_plan(&acme.editor, ours.plan).expect("plan unchanged");
    assert_eq!(plan.record.plan.cycle_id, ours.cycle);
    let report = service.strategic_report(&acme.editor, ours.report).expect("report unchanged");
    assert_eq!(report.record.report.action_plan_id, ours.plan);
    let risk = service.risk(&acme.editor, risk.id).expect("risk unchanged");
    assert_eq!(risk.record.risk.cycle_id, ours.cycle);
    let progress = service
        .initiative_report(&acme.editor, progress.id, today)
        .expect("initiative report unchanged");
    assert_eq!(progress.report.record.initiative_id, ours.initiative);
    let resource = service.resource_plan(&acme.editor, ours.resource).expect("resource unchanged");
    assert_eq!(resource.record.initiative_id, ours.initiative);
    let usage = service.resource_report(&acme.editor, usage.id).expect("usage unchanged");
    assert_eq!(usage.report.record.plan_id, ours.resource);
    let swot = service.swot_report(&acme.editor, swot.id).expect("swot report unchanged");
    assert_eq!(swot.record.strategic_report_id, ours.report);
    assert_eq!(service.strategic_reports(&nile.editor).expect("list").len(), 1);

    // Re-pointing within the same organization still works for the superuser.
    let second_cycle = service.create_cycle(&acme.editor, cycle_draft()).expect("cycle saves");
    let moved = service
        .update_risk(&root, risk.id, risk_draft(second_cycle.id))
        .expect("same-tenant parent accepted");
    assert_eq!(moved.row.record.risk.cycle_id, second_cycle.id);
    assert_eq!(moved.row.organization_id, acme.id());
}
