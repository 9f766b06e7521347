use deadpool_postgres::PoolError;
use thiserror::Error;
use tokio_postgres::Error as PgError;
use tracing::{info, instrument};

use crate::db::{DbPoolError, PgPool};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("failed to run migration: {0}")]
    Postgres(#[from] PgError),
    #[error("failed to build pool: {0}")]
    PoolBuild(#[from] DbPoolError),
}

struct Migration {
    id: i32,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    id: 1,
    description: "staffing dashboard base schema",
    sql: r#"
CREATE EXTENSION IF NOT EXISTS "pgcrypto";

CREATE TABLE IF NOT EXISTS ops.employees (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    email TEXT,
    role TEXT NOT NULL CHECK (role IN (
        'Account Manager', 'Recruiter', 'Business Development',
        'Operations Manager', 'Owner'
    )),
    department TEXT,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS ops.clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    account_manager_id UUID REFERENCES ops.employees(id),
    billing_type TEXT NOT NULL DEFAULT '',
    payment_terms TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'Active'
        CHECK (status IN ('Active', 'Hold', 'Inactive')),
    last_payment_date DATE,
    outstanding DOUBLE PRECISION NOT NULL DEFAULT 0 CHECK (outstanding >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS ops.jobs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES ops.clients(id),
    title TEXT NOT NULL,
    priority TEXT NOT NULL DEFAULT 'Medium'
        CHECK (priority IN ('High', 'Medium', 'Low')),
    open_date DATE NOT NULL DEFAULT CURRENT_DATE,
    status TEXT NOT NULL DEFAULT 'Open' CHECK (status IN (
        'Open', 'On Hold', 'Interviewing', 'Offer Made',
        'Filled', 'Closed - No Hire'
    )),
    submissions INTEGER NOT NULL DEFAULT 0 CHECK (submissions >= 0),
    interviews INTEGER NOT NULL DEFAULT 0 CHECK (interviews >= 0),
    offers INTEGER NOT NULL DEFAULT 0 CHECK (offers >= 0),
    starts INTEGER NOT NULL DEFAULT 0 CHECK (starts >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_jobs_client ON ops.jobs(client_id);

CREATE TABLE IF NOT EXISTS ops.job_recruiters (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    job_id UUID NOT NULL REFERENCES ops.jobs(id) ON DELETE CASCADE,
    employee_id UUID NOT NULL REFERENCES ops.employees(id),
    assigned_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (job_id, employee_id)
);

CREATE TABLE IF NOT EXISTS ops.recruiter_activities (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    employee_id UUID NOT NULL REFERENCES ops.employees(id),
    job_id UUID NOT NULL REFERENCES ops.jobs(id),
    activity_date DATE NOT NULL DEFAULT CURRENT_DATE,
    resumes_sourced INTEGER NOT NULL DEFAULT 0 CHECK (resumes_sourced >= 0),
    submitted INTEGER NOT NULL DEFAULT 0 CHECK (submitted >= 0),
    am_submissions INTEGER NOT NULL DEFAULT 0 CHECK (am_submissions >= 0),
    end_client_submissions INTEGER NOT NULL DEFAULT 0
        CHECK (end_client_submissions >= 0),
    feedback_received INTEGER NOT NULL DEFAULT 0 CHECK (feedback_received >= 0),
    interviews_scheduled INTEGER NOT NULL DEFAULT 0
        CHECK (interviews_scheduled >= 0),
    hired INTEGER NOT NULL DEFAULT 0 CHECK (hired >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_recruiter_activities_date
    ON ops.recruiter_activities(activity_date, employee_id);

CREATE TABLE IF NOT EXISTS ops.am_activities (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    employee_id UUID NOT NULL REFERENCES ops.employees(id),
    client_id UUID NOT NULL REFERENCES ops.clients(id),
    activity_date DATE NOT NULL DEFAULT CURRENT_DATE,
    action_taken TEXT NOT NULL,
    outcome TEXT,
    next_step TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS ops.bd_prospects (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    prospect_name TEXT NOT NULL,
    contact_name TEXT,
    contact_email TEXT,
    industry TEXT,
    stage TEXT NOT NULL DEFAULT 'Lead' CHECK (stage IN (
        'Lead', 'Contacted', 'Meeting Scheduled', 'Proposal Sent',
        'Negotiation', 'Closed Won', 'Closed Lost'
    )),
    probability INTEGER NOT NULL DEFAULT 0
        CHECK (probability >= 0 AND probability <= 100),
    bd_owner_id UUID REFERENCES ops.employees(id),
    last_follow_up DATE,
    next_action TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS ops.invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_no TEXT NOT NULL,
    client_id UUID NOT NULL REFERENCES ops.clients(id),
    billing_month TEXT NOT NULL,
    amount DOUBLE PRECISION NOT NULL CHECK (amount > 0),
    sent_date DATE,
    due_date DATE,
    status TEXT NOT NULL DEFAULT 'Draft'
        CHECK (status IN ('Draft', 'Sent', 'Paid', 'Overdue')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_invoices_client ON ops.invoices(client_id);

CREATE TABLE IF NOT EXISTS ops.payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES ops.clients(id),
    invoice_id UUID REFERENCES ops.invoices(id),
    amount DOUBLE PRECISION NOT NULL,
    date_received DATE NOT NULL DEFAULT CURRENT_DATE,
    payment_mode TEXT NOT NULL DEFAULT '',
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS ops.employee_scores (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    employee_id UUID NOT NULL REFERENCES ops.employees(id),
    score_month TEXT NOT NULL,
    productivity DOUBLE PRECISION NOT NULL
        CHECK (productivity >= 1 AND productivity <= 5),
    quality DOUBLE PRECISION NOT NULL CHECK (quality >= 1 AND quality <= 5),
    discipline DOUBLE PRECISION NOT NULL
        CHECK (discipline >= 1 AND discipline <= 5),
    ownership DOUBLE PRECISION NOT NULL
        CHECK (ownership >= 1 AND ownership <= 5),
    final_score DOUBLE PRECISION NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (employee_id, score_month)
);

CREATE TABLE IF NOT EXISTS ops.kpi_targets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    department TEXT NOT NULL,
    kpi_name TEXT NOT NULL,
    target_value DOUBLE PRECISION NOT NULL DEFAULT 0,
    period TEXT NOT NULL DEFAULT 'monthly',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (department, kpi_name, period)
);

CREATE TABLE IF NOT EXISTS ops.custom_kpi_fields (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    department TEXT NOT NULL,
    field_name TEXT NOT NULL,
    field_type TEXT NOT NULL DEFAULT 'text'
        CHECK (field_type IN ('text', 'number', 'currency', 'percentage', 'date')),
    field_order INTEGER NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS ops.custom_kpi_values (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    custom_field_id UUID NOT NULL
        REFERENCES ops.custom_kpi_fields(id) ON DELETE CASCADE,
    employee_id UUID NOT NULL REFERENCES ops.employees(id),
    period TEXT NOT NULL,
    value TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (custom_field_id, employee_id, period)
);

CREATE TABLE IF NOT EXISTS ops.user_roles (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL UNIQUE,
    role TEXT NOT NULL CHECK (role IN (
        'admin', 'account_manager', 'recruiter', 'business_dev',
        'operations', 'finance', 'viewer'
    )),
    department_access TEXT[] NOT NULL DEFAULT '{}',
    department_edit_access TEXT[] NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS ops.audit_logs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID,
    action TEXT NOT NULL,
    table_name TEXT,
    record_id UUID,
    old_values JSONB,
    new_values JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_audit_logs_created
    ON ops.audit_logs(created_at DESC);
"#,
}];

#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrationError> {
    let mut client = pool.get().await?;
    client
        .batch_execute(
            "CREATE SCHEMA IF NOT EXISTS ops;
             CREATE TABLE IF NOT EXISTS ops.schema_migrations (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
             );",
        )
        .await?;

    for migration in MIGRATIONS {
        let already_applied: bool = client
            .query_one(
                "SELECT EXISTS (SELECT 1 FROM ops.schema_migrations WHERE id = $1)",
                &[&migration.id],
            )
            .await?
            .get(0);

        if already_applied {
            continue;
        }

        let tx = client.transaction().await?;
        tx.batch_execute(migration.sql).await?;
        tx.execute(
            "INSERT INTO ops.schema_migrations (id, description) VALUES ($1, $2)",
            &[&migration.id, &migration.description],
        )
        .await?;
        tx.commit().await?;

        info!(
            id = migration.id,
            description = migration.description,
            "applied migration"
        );
    }

    Ok(())
}
