use rust_decimal::Decimal;

use super::common::*;
use crate::domain::{
    InitiativeReport, RecordId, ResourceItemPlan, ResourceItemReport, ResourceType, SwotReport,
    SwotType,
};
use crate::repository::MemoryStore;
use crate::service::{ServiceError, StrategyService};

fn assert_gone<T: std::fmt::Debug>(result: Result<T, ServiceError>) {
    match result {
        Err(ServiceError::NotFound(_)) => {}
        other => panic!("expected the record to be gone, got {other:?}"),
    }
}

/// Cycle, KPI, one plan, one report against it, one SWOT report on the report and
/// one risk on the cycle, all owned by `tenant`.
struct StrategyChain {
    cycle: RecordId,
    hierarchy: RecordId,
    plan: RecordId,
    report: RecordId,
    swot: RecordId,
    risk: RecordId,
}

fn strategy_chain(service: &StrategyService<MemoryStore>, tenant: &Tenant) -> StrategyChain {
    let hierarchy = service
        .create_hierarchy(&tenant.editor, revenue_kpi())
        .expect("hierarchy saves")
        .row
        .id;
    let cycle = service
        .create_cycle(&tenant.editor, cycle_draft())
        .expect("cycle saves")
        .id;
    let plan = service
        .create_action_plan(&tenant.editor, plan_draft(cycle, hierarchy, 100))
        .expect("plan saves")
        .id;
    let report = service
        .create_strategic_report(&tenant.editor, report_draft(plan, 15))
        .expect("report saves")
        .id;
    let swot = service
        .create_swot_report(
            &tenant.editor,
            SwotReport {
                strategic_report_id: report,
                analysis: swot_entry(SwotType::Strength, "Effective board oversight", "High"),
            },
        )
        .expect("swot report saves")
        .row
        .id;
    let risk = service
        .create_risk(&tenant.editor, risk_draft(cycle))
        .expect("risk saves")
        .row
        .id;

    StrategyChain {
        cycle,
        hierarchy,
        plan,
        report,
        swot,
        risk,
    }
}

#[test]
fn deleting_a_cycle_removes_its_plans_reports_and_risks() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
    let chain = strategy_chain(&service, &acme);

    service.delete_cycle(&acme.editor, chain.cycle).expect("cycle deletes");

    assert_gone(service.action_plan(&acme.editor, chain.plan));
    assert_gone(service.strategic_report(&acme.editor, chain.report));
    assert_gone(service.swot_report(&acme.editor, chain.swot));
    assert_gone(service.risk(&acme.editor, chain.risk));
    assert!(service.strategic_reports(&acme.editor).expect("list").is_empty());
    assert!(service.swot_reports(&acme.editor).expect("list").is_empty());
    assert!(service.risks(&acme.editor).expect("list").is_empty());

    // The KPI is not owned by the cycle.
    service.hierarchy(&acme.editor, chain.hierarchy).expect("hierarchy survives");
}

#[test]
fn deleting_an_action_plan_removes_the_reports_filed_against_it() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
    let chain = strategy_chain(&service, &acme);

    service.delete_action_plan(&acme.editor, chain.plan).expect("plan deletes");
    assert_gone(service.strategic_report(&acme.editor, chain.report));
    assert!(service.strategic_reports(&acme.editor).expect("list").is_empty());
    assert_gone(service.swot_report(&acme.editor, chain.swot));

    service.delete_cycle(&acme.editor, chain.cycle).expect("emptied cycle deletes");
    assert!(service.action_plans(&acme.editor).expect("list").is_empty());
    assert!(service.risks(&acme.editor).expect("list").is_empty());
}

#[test]
fn deleting_a_hierarchy_removes_the_plans_measured_against_it() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
    let chain = strategy_chain(&service, &acme);

    service.delete_hierarchy(&acme.editor, chain.hierarchy).expect("hierarchy deletes");

    assert_gone(service.action_plan(&acme.editor, chain.plan));
    assert_gone(service.strategic_report(&acme.editor, chain.report));
    service.cycle(&acme.editor, chain.cycle).expect("cycle survives");
    service.risk(&acme.editor, chain.risk).expect("risk survives");
}

#[test]
fn deleting_a_strategic_report_removes_only_its_swot_reports() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
    let chain = strategy_chain(&service, &acme);
    let sibling = service
        .create_strategic_report(&acme.editor, report_draft(chain.plan, 18))
        .expect("second report saves");
    let kept = service
        .create_swot_report(
            &acme.editor,
            SwotReport {
                strategic_report_id: sibling.id,
                analysis: swot_entry(SwotType::Weakness, "Board lacks diversity", "Low"),
            },
        )
        .expect("swot report saves")
        .row;

    service
        .delete_strategic_report(&acme.editor, chain.report)
        .expect("report deletes");

    assert_gone(service.swot_report(&acme.editor, chain.swot));
    let remaining = service.swot_reports(&acme.editor).expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);
}

#[test]
fn deleting_an_initiative_removes_its_reports_plans_and_usage() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
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
        .expect("usage saves");

    service.delete_initiative(&acme.editor, plan.id).expect("initiative deletes");

    assert_gone(service.initiative_report(&acme.editor, report.id, today));
    assert_gone(service.resource_plan(&acme.editor, resource.id));
    assert_gone(service.resource_report(&acme.editor, usage.id));
    assert!(service.resource_reports(&acme.editor).expect("list").is_empty());
    assert!(service.initiative_reports(&acme.editor, today).expect("list").is_empty());
}

#[test]
fn deleting_a_resource_plan_removes_its_usage() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
    let plan = service
        .create_initiative(&acme.editor, initiative(1000, 40))
        .expect("initiative saves")
        .row;
    let resource = service
        .create_resource_plan(
            &acme.editor,
            ResourceItemPlan {
                initiative_id: plan.id,
                resource_type: ResourceType::Budget,
                resource_name: "Operating budget".to_string(),
                resource_required: Decimal::from(500),
            },
        )
        .expect("resource plan saves");
    let usage = service
        .create_resource_report(
            &acme.editor,
            ResourceItemReport {
                plan_id: resource.id,
                resource_used: Decimal::from(120),
                notes: String::new(),
            },
        )
        .expect("usage saves");

    service
        .delete_resource_plan(&acme.editor, resource.id)
        .expect("resource plan deletes");

    assert_gone(service.resource_report(&acme.editor, usage.id));
    service.initiative(&acme.editor, plan.id).expect("initiative survives");
}

#[test]
fn another_tenant_cannot_trigger_a_cascade() {
    let service = memory_service();
    let acme = register(&service, "Acme Health", "hana@acme.org");
    let nile = register(&service, "Blue Nile", "abel@nile.org");
    let chain = strategy_chain(&service, &acme);

    assert_gone(service.delete_cycle(&nile.editor, chain.cycle));
    assert_gone(service.delete_hierarchy(&nile.editor, chain.hierarchy));
    assert_gone(service.delete_action_plan(&nile.editor, chain.plan));
    assert_gone(service.delete_strategic_report(&nile.editor, chain.report));

    service.action_plan(&acme.editor, chain.plan).expect("plan untouched");
    service.strategic_report(&acme.editor, chain.report).expect("report untouched");
    service.swot_report(&acme.editor, chain.swot).expect("swot report untouched");
    service.risk(&acme.editor, chain.risk).expect("risk untouched");
}
