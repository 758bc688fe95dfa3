//! Per-shape SQL planning.
//!
//! Each aggregation shape has one generic plan. Every plan takes the
//! parameters `(user_id, start_date, end_date)`, groups by calendar date,
//! orders ascending and yields `date` as TEXT and `value` as REAL (NULL
//! when nothing was recorded). Identifiers come from the validated catalog.

use crate::domain::analytics::catalog::{AggregationRule, ColumnRef, JoinReducer, JoinSide};

const LOG_ALIAS: &str = "l";
const JOINED_ALIAS: &str = "j";
const TABLE_ALIAS: &str = "t";

pub fn plan(rule: &AggregationRule) -> String {
    match rule {
        AggregationRule::JoinedDailySum {
            log_table,
            date_column,
            joined_table,
            log_key,
            joined_key,
            terms,
            reducer,
            user_column,
        } => joined_daily_sum(
            log_table,
            date_column,
            joined_table,
            log_key,
            joined_key,
            terms,
            *reducer,
            user_column,
        ),
        AggregationRule::DailyValue {
            table,
            date_column,
            value_column,
            user_column,
        } => single_table(
            table,
            date_column,
            user_column,
            &format!("AVG({t}.{value_column})", t = TABLE_ALIAS),
            None,
        ),
        AggregationRule::RecordedDailyValue {
            table,
            date_column,
            value_column,
            user_column,
        } => single_table(
            table,
            date_column,
            user_column,
            &format!("AVG({t}.{value_column})", t = TABLE_ALIAS),
            Some(format!("{t}.{value_column} IS NOT NULL", t = TABLE_ALIAS)),
        ),
        AggregationRule::BilateralAverage {
            table,
            date_column,
            left_column,
            right_column,
            user_column,
        } => single_table(
            table,
            date_column,
            user_column,
            &format!(
                "AVG((COALESCE({t}.{left_column}, 0) + COALESCE({t}.{right_column}, 0)) / 2.0)",
                t = TABLE_ALIAS
            ),
            Some(format!(
                "({t}.{left_column} IS NOT NULL OR {t}.{right_column} IS NOT NULL)",
                t = TABLE_ALIAS
            )),
        ),
        AggregationRule::SessionDuration {
            table,
            date_column,
            start_column,
            end_column,
            user_column,
        } => single_table(
            table,
            date_column,
            user_column,
            &format!(
                "SUM((strftime('%s', {t}.{end_column}) - strftime('%s', {t}.{start_column})) / 60.0)",
                t = TABLE_ALIAS
            ),
            Some(format!(
                "{t}.{start_column} IS NOT NULL AND {t}.{end_column} IS NOT NULL",
                t = TABLE_ALIAS
            )),
        ),
    }
}

fn column(term: &ColumnRef) -> String {
    let alias = match term.side {
        JoinSide::Log => LOG_ALIAS,
        JoinSide::Joined => JOINED_ALIAS,
    };
    format!("{}.{}", alias, term.column)
}

#[allow(clippy::too_many_arguments)]
fn joined_daily_sum(
    log_table: &str,
    date_column: &str,
    joined_table: &str,
    log_key: &str,
    joined_key: &str,
    terms: &[ColumnRef],
    reducer: JoinReducer,
    user_column: &str,
) -> String {
    let aggregate = match reducer {
        JoinReducer::Sum => {
            let product = terms.iter().map(column).collect::<Vec<_>>().join(" * ");
            format!("SUM({product})")
        }
        JoinReducer::Count => {
            let counted = terms.first().map(column).unwrap_or_else(|| "*".to_string());
            format!("COUNT({counted})")
        }
    };
    let l = LOG_ALIAS;
    let j = JOINED_ALIAS;
    let day = calendar_day(l, date_column);

    format!(
        "SELECT {day} AS date, CAST({aggregate} AS REAL) AS value \
         FROM {log_table} {l} \
         JOIN {joined_table} {j} ON {l}.{log_key} = {j}.{joined_key} \
         WHERE {l}.{user_column} = ? AND {day} BETWEEN ? AND ? \
         GROUP BY {day} \
         ORDER BY {day}"
    )
}

fn single_table(
    table: &str,
    date_column: &str,
    user_column: &str,
    aggregate: &str,
    filter: Option<String>,
) -> String {
    let t = TABLE_ALIAS;
    let day = calendar_day(t, date_column);
    let extra = filter.map(|f| format!(" AND {f}")).unwrap_or_default();

    format!(
        "SELECT {day} AS date, CAST({aggregate} AS REAL) AS value \
         FROM {table} {t} \
         WHERE {t}.{user_column} = ? AND {day} BETWEEN ? AND ?{extra} \
         GROUP BY {day} \
         ORDER BY {day}"
    )
}

/// Calendar date of a stored DATE or DATETIME column, as `YYYY-MM-DD` text.
fn calendar_day(alias: &str, date_column: &str) -> String {
    format!("date({alias}.{date_column})")
}
