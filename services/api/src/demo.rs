use crate::infra::{parse_catalog_kind, parse_date};
use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use strategy_tracker::access::{Identity, Role};
use strategy_tracker::catalog::{CatalogKind, Catalogs};
use strategy_tracker::config::CatalogConfig;
use strategy_tracker::domain::{
    DirectionOfChange, IndicatorType, InitiativePlanning, InitiativeReport, InvitationDraft,
    OrganizationDraft, OrganizationType, RiskDraft, RiskStatus, StakeholderCategory,
    StakeholderDraft, StakeholderType, StatementDraft, StrategicActionPlanDraft,
    StrategicCycleDraft, StrategicReportDraft, StrategyHierarchy, SwotAnalysis, SwotReport,
    SwotType, TimeHorizonType, ValueDraft,
};
use strategy_tracker::error::AppError;
use strategy_tracker::repository::MemoryStore;
use strategy_tracker::service::{ServiceError, StrategyService};

#[derive(Args, Debug)]
pub(crate) struct CatalogArgs {
    /// Catalog to browse: strategy_map, swot, risk, initiative, values or mission
    #[arg(value_parser = parse_catalog_kind)]
    pub(crate) kind: CatalogKind,
    /// Selected values, outermost level first
    pub(crate) levels: Vec<String>,
    /// Directory holding catalog JSON files that replace the embedded ones
    #[arg(long)]
    pub(crate) catalog_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reporting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let CatalogArgs {
        kind,
        levels,
        catalog_dir,
    } = args;

    let catalogs = Catalogs::load(&CatalogConfig {
        directory: catalog_dir,
    })?;
    let catalog = catalogs.get(kind);
    let path: Vec<&str> = levels.iter().map(String::as_str).collect();

    let options = catalog.options(&path);
    let text = catalog.lookup_leaf(&path);
    if options.is_empty() && text.is_empty() {
        println!("(nothing listed beneath {})", describe(kind, &path));
        return Ok(());
    }

    for option in options {
        println!("{option}");
    }
    if !text.is_empty() {
        println!("{}: {text}", leaf_label(kind));
    }
    Ok(())
}

fn leaf_label(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::StrategyMap => "Formula",
        CatalogKind::Risk => "Mitigation",
        CatalogKind::Values => "Label",
        CatalogKind::Swot | CatalogKind::Initiative | CatalogKind::Mission => "Note",
    }
}

fn describe(kind: CatalogKind, path: &[&str]) -> String {
    if path.is_empty() {
        kind.key().to_string()
    } else {
        format!("{} > {}", kind.key(), path.join(" > "))
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let catalogs = Catalogs::embedded()?;
    let service = StrategyService::new(Arc::new(MemoryStore::default()), Arc::new(catalogs));

    println!("Strategy tracking demo (as of {today})");
    if let Err(err) = walkthrough(&service, today) {
        println!("  Demo stopped: {err}");
    }
    Ok(())
}

fn walkthrough(service: &StrategyService<MemoryStore>, today: NaiveDate) -> Result<(), ServiceError> {
    let founder = Identity {
        email: "director@riverside-health.org".to_string(),
        organization_id: None,
        role: None,
        is_superuser: false,
    };
    let organization = service.register_organization(
        &founder,
        OrganizationDraft {
            name: "Riverside Health".to_string(),
            organization_type: OrganizationType::NonProfit,
            sector: "healthcare".to_string(),
            address: "12 River Road".to_string(),
            contact_person: "Operations Director".to_string(),
        },
    )?;
    let editor = service.resolve_access(Identity {
        organization_id: Some(organization.id),
        ..founder
    })?;
    println!(
        "- Registered {} ({}) with {} as {:?}",
        organization.name(),
        organization.id,
        editor.identity().email,
        editor.role()
    );

    let invitation = service.send_invitation(
        &editor,
        InvitationDraft {
            email: "analyst@riverside-health.org".to_string(),
            role: Role::Viewer,
            message: Some("Please review our strategy".to_string()),
        },
    )?;
    println!(
        "- Invited {} as {} (token {})",
        invitation.record.email, invitation.record.role, invitation.record.token
    );

    println!("\nIdentity");
    let suggestions = service.mission_suggestions(&editor)?;
    if let Some(first) = suggestions.statements.first() {
        let mission = service.create_mission(
            &editor,
            StatementDraft {
                statement: first.clone(),
            },
        )?;
        println!(
            "  - Mission (first of {} suggestions for {}): {}",
            suggestions.statements.len(),
            suggestions.sector,
            mission.row.record.statement
        );
    }
    for key in ["integrity", "customer_focus", "Community first"] {
        let saved = service.create_value(
            &editor,
            ValueDraft {
                value: key.to_string(),
            },
        )?;
        let value = &saved.row.record;
        println!(
            "  - Value {} [{}]{}",
            value.label,
            value.category.as_deref().unwrap_or("unlisted"),
            if saved.advisories.is_empty() { "" } else { " (advisory)" }
        );
    }

    println!("\nStakeholders");
    for (name, impact, influence, interest, risk) in [
        ("Regional Health Bureau", "very_high", "high", "high", "medium"),
        ("Community Advisory Board", "medium", "low", "very_high", "low"),
        ("Equipment Supplier", "low", "medium", "low", "high"),
    ] {
        service.create_stakeholder(
            &editor,
            StakeholderDraft {
                name: name.to_string(),
                stakeholder_type: StakeholderType::External,
                category: StakeholderCategory::Strategic,
                impact_level: impact.to_string(),
                influence_score: influence.to_string(),
                interest_level: interest.to_string(),
                risk_level: risk.to_string(),
                satisfaction_level: "medium".to_string(),
                email: None,
                phone: None,
                department: None,
                last_engagement_date: None,
                next_engagement_date: None,
                notes: None,
            },
        )?;
    }
    for view in service.stakeholders(&editor, today)? {
        let stakeholder = &view.stakeholder.record;
        println!(
            "  - {} {}: score {} | key {} | attention {} | {:?}",
            stakeholder.code,
            stakeholder.profile.name,
            stakeholder.engagement.engagement_priority_score,
            stakeholder.engagement.is_key_stakeholder,
            stakeholder.engagement.requires_attention,
            view.quadrant
        );
    }

    println!("\nStrategy map");
    let cycle = service.create_cycle(
        &editor,
        StrategicCycleDraft {
            time_horizon: "1 year".to_string(),
            time_horizon_type: TimeHorizonType::ShortTerm,
            start_date: today,
            end_date: today + chrono::Duration::days(364),
        },
    )?;
    println!("  - Cycle: {}", cycle.record.name);

    let kpi = service.create_hierarchy(
        &editor,
        StrategyHierarchy {
            perspective: "Financial Perspective".to_string(),
            focus_area: "Revenue Growth & Diversification".to_string(),
            objective: "Enhance Total Revenue Performance".to_string(),
            kpi: "Total revenue growth (%)".to_string(),
            formula: String::new(),
        },
    )?;
    println!(
        "  - KPI: {} (formula: {})",
        kpi.row.record.kpi, kpi.row.record.formula
    );

    let plan = service.create_action_plan(
        &editor,
        StrategicActionPlanDraft {
            cycle_id: cycle.id,
            hierarchy_id: kpi.row.id,
            indicator_type: IndicatorType::Lagg,
            direction_of_change: DirectionOfChange::Increasing,
            baseline: Decimal::from(5),
            target: Decimal::from(12),
            weight: Decimal::from(30),
            status: "active".to_string(),
        },
    )?;
    let report = service.create_strategic_report(
        &editor,
        StrategicReportDraft {
            action_plan_id: plan.id,
            achievement: Decimal::from(9),
            status: "on_track".to_string(),
            data_source: Some("Quarterly finance review".to_string()),
            data_collector: None,
            progress_summary: None,
            performance_summary: None,
            challenges: None,
            successes: None,
            lessons_learned: None,
        },
    )?;
    let metrics = &report.record.metrics;
    println!(
        "  - Report: {}% achieved | variance {} | weighted {}",
        metrics.percent_achieved, metrics.variance, metrics.weighted_score
    );
    service.create_swot_report(
        &editor,
        SwotReport {
            strategic_report_id: report.id,
            analysis: SwotAnalysis {
                swot_type: SwotType::Strength,
                pillar: "Financial Position".to_string(),
                factor: "Diversified revenue base".to_string(),
                priority: "High".to_string(),
                impact: "High".to_string(),
                likelihood: None,
                description: None,
            },
        },
    )?;
    for row in service.swot_reports(&editor)? {
        let analysis = &row.record.analysis;
        println!(
            "  - SWOT {}: {} ({} priority)",
            analysis.swot_type.key(),
            analysis.factor,
            analysis.priority
        );
    }

    println!("\nRisks");
    for (category, name, likelihood, impact) in [
        ("Financial Risks", "Revenue decline in key markets", "high", "high"),
        ("Financial Risks", "Donor funding withdrawn", "medium", "very_high"),
    ] {
        let saved = service.create_risk(
            &editor,
            RiskDraft {
                cycle_id: cycle.id,
                risk_category: category.to_string(),
                risk_name: name.to_string(),
                likelihood: likelihood.to_string(),
                impact: impact.to_string(),
                status: RiskStatus::Identified,
            },
        )?;
        let entry = &saved.row.record;
        let mitigation = if entry.mitigation_action.is_empty() {
            "(none listed)"
        } else {
            entry.mitigation_action.as_str()
        };
        println!(
            "  - {} severity {}: {}",
            entry.risk.risk_name, entry.severity_score, mitigation
        );
        for note in &saved.advisories {
            println!("    advisory: {}", note.message);
        }
    }

    println!("\nInitiatives");
    let initiative = service.create_initiative(
        &editor,
        InitiativePlanning {
            focus_area: "Financial Sustainability".to_string(),
            dimension: "Revenue Diversification".to_string(),
            name: "Open a fee-for-service wing".to_string(),
            description: String::new(),
            total_budget_planned: Decimal::from(50_000),
            total_hr_planned: Decimal::from(12),
            priority: "high".to_string(),
            baseline_status: "low".to_string(),
            target_status: "high".to_string(),
            start_date: Some(today),
            end_date: Some(today + chrono::Duration::days(180)),
        },
    )?;
    let progress = service.create_initiative_report(
        &editor,
        InitiativeReport {
            initiative_id: initiative.row.id,
            total_budget_spent: Decimal::from(20_000),
            total_actual_hr: Decimal::from(6),
            achieved_status: "medium".to_string(),
            notes: "Site lease signed".to_string(),
        },
    )?;
    let view = service.initiative_report(&editor, progress.id, today)?;
    println!(
        "  - {}: budget {}% used ({} left) | HR {}% | status {}% | {} days remaining",
        view.initiative_name,
        view.progress.budget_utilization_percent,
        view.progress.budget_remaining,
        view.progress.hr_utilization_percent,
        view.progress.status_achievement_percent,
        view.remaining_days.unwrap_or_default()
    );
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("  Progress payload:\n{json}"),
        Err(err) => println!("  Progress payload unavailable: {err}"),
    }

    Ok(())
}
