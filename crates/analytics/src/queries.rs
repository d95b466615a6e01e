//! Report SQL.
//!
//! "Latest" position values always mean the rows at each portfolio's most
//! recent `POSITION_HISTORY.TIMESTAMP`. Parameters are positional `?` binds.

pub const CLIENT_COUNT: &str = "SELECT COUNT(DISTINCT CLIENT_ID) AS CNT FROM CLIENTS";

pub const ADVISOR_COUNT: &str = "SELECT COUNT(DISTINCT ADVISOR_ID) AS CNT FROM ADVISORS";

/// Latest non-cash market value across every portfolio.
pub const TOTAL_AUM: &str = r#"
    WITH latest AS (
        SELECT PORTFOLIO_ID, MAX(TIMESTAMP) AS MAX_TS
        FROM POSITION_HISTORY
        GROUP BY PORTFOLIO_ID
    )
    SELECT COALESCE(SUM(ph.MARKET_VALUE), 0) AS AUM
    FROM POSITION_HISTORY ph
    JOIN latest lt
      ON ph.PORTFOLIO_ID = lt.PORTFOLIO_ID AND ph.TIMESTAMP = lt.MAX_TS
    WHERE ph.TICKER <> 'CASH'
"#;

/// Fractional change in non-cash value since the start of the calendar year.
/// NULL when the start-of-year value is zero or absent.
pub const YTD_GROWTH: &str = r#"
    WITH port AS (
        SELECT p.PORTFOLIO_ID,
               TO_TIMESTAMP(DATE_TRUNC('YEAR', CURRENT_DATE)) AS START_OF_YEAR,
               TO_TIMESTAMP(CURRENT_DATE) AS END_DATE
        FROM PORTFOLIOS AS p
    ),
    daily_portfolio_value AS (
        SELECT ph.PORTFOLIO_ID, ph.TIMESTAMP, SUM(ph.MARKET_VALUE) AS TOT_MARKET_VALUE
        FROM POSITION_HISTORY AS ph
        WHERE ph.TICKER <> 'CASH'
        GROUP BY 1, 2
    ),
    start_of_year_value AS (
        SELECT 1 AS JOIN_ID, p.START_OF_YEAR, SUM(TOT_MARKET_VALUE) AS TOT_MARKET_VALUE
        FROM port AS p
        ASOF JOIN daily_portfolio_value AS pv
        MATCH_CONDITION (p.START_OF_YEAR >= pv.TIMESTAMP)
        ON p.PORTFOLIO_ID = pv.PORTFOLIO_ID
        GROUP BY 1, 2
    ),
    latest_value AS (
        SELECT 1 AS JOIN_ID, p.END_DATE, SUM(TOT_MARKET_VALUE) AS TOT_MARKET_VALUE
        FROM port AS p
        ASOF JOIN daily_portfolio_value AS pv
        MATCH_CONDITION (p.END_DATE >= pv.TIMESTAMP)
        ON p.PORTFOLIO_ID = pv.PORTFOLIO_ID
        GROUP BY 1, 2
    )
    SELECT (l.TOT_MARKET_VALUE - s.TOT_MARKET_VALUE)
           / NULLIF(s.TOT_MARKET_VALUE, 0) AS YTD_GROWTH_PCT
    FROM latest_value AS l
    JOIN start_of_year_value AS s ON (l.JOIN_ID = s.JOIN_ID)
"#;

pub const WEALTH_SEGMENTS: &str = r#"
    WITH client_portfolio_values AS (
        SELECT p.CLIENT_ID,
               SUM(ph.MARKET_VALUE) AS TOTAL_PORTFOLIO_VALUE
        FROM PORTFOLIOS p
        JOIN POSITION_HISTORY ph ON p.PORTFOLIO_ID = ph.PORTFOLIO_ID
        WHERE ph.TIMESTAMP = (
            SELECT MAX(TIMESTAMP) FROM POSITION_HISTORY ph2
            WHERE ph2.PORTFOLIO_ID = ph.PORTFOLIO_ID
        )
        GROUP BY 1
    ),
    wealth_segments AS (
        SELECT c.CLIENT_ID, c.FIRST_NAME, c.LAST_NAME, c.NET_WORTH_ESTIMATE,
               c.RISK_TOLERANCE, c.ANNUAL_INCOME,
               COALESCE(cpv.TOTAL_PORTFOLIO_VALUE, 0) AS PORTFOLIO_VALUE,
               CASE
                   WHEN c.NET_WORTH_ESTIMATE >= 50000000 THEN 'Ultra HNW'
                   WHEN c.NET_WORTH_ESTIMATE >= 5000000 THEN 'Very HNW'
                   WHEN c.NET_WORTH_ESTIMATE >= 1000000 THEN 'HNW'
                   WHEN c.NET_WORTH_ESTIMATE >= 250000 THEN 'Emerging HNW'
                   ELSE 'Mass Affluent'
               END AS WEALTH_SEGMENT
        FROM CLIENTS c
        LEFT JOIN client_portfolio_values cpv ON c.CLIENT_ID = cpv.CLIENT_ID
    )
    SELECT * FROM wealth_segments
    ORDER BY NET_WORTH_ESTIMATE DESC NULLS LAST
"#;

pub const CLIENT_ENGAGEMENT: &str = r#"
    WITH client_interactions AS (
        SELECT c.CLIENT_ID, c.FIRST_NAME, c.LAST_NAME,
               COUNT(DISTINCT i.INTERACTION_ID) AS TOTAL_INTERACTIONS,
               MAX(i.TIMESTAMP) AS LAST_INTERACTION,
               DATEDIFF(DAY, MAX(i.TIMESTAMP), CURRENT_DATE) AS DAYS_SINCE_LAST_CONTACT
        FROM CLIENTS c
        LEFT JOIN INTERACTIONS i ON c.CLIENT_ID = i.CLIENT_ID
        GROUP BY 1, 2, 3
    )
    SELECT * FROM client_interactions
    ORDER BY TOTAL_INTERACTIONS DESC, DAYS_SINCE_LAST_CONTACT ASC
"#;

pub const NEXT_BEST_ACTIONS: &str = r#"
    WITH client_portfolio_summary AS (
        SELECT p.CLIENT_ID,
               COUNT(DISTINCT p.PORTFOLIO_ID) AS NUM_PORTFOLIOS,
               SUM(ph.MARKET_VALUE) AS TOTAL_AUM
        FROM PORTFOLIOS p
        JOIN POSITION_HISTORY ph ON p.PORTFOLIO_ID = ph.PORTFOLIO_ID
        WHERE ph.TIMESTAMP = (
            SELECT MAX(TIMESTAMP) FROM POSITION_HISTORY ph2
            WHERE ph2.PORTFOLIO_ID = ph.PORTFOLIO_ID
        )
        GROUP BY 1
    ),
    client_analysis AS (
        SELECT c.CLIENT_ID, c.FIRST_NAME, c.LAST_NAME, c.NET_WORTH_ESTIMATE,
               c.RISK_TOLERANCE, c.ANNUAL_INCOME, c.AGE, c.LIFE_EVENT,
               cps.NUM_PORTFOLIOS, COALESCE(cps.TOTAL_AUM, 0) AS TOTAL_AUM,
               CASE
                   WHEN c.NET_WORTH_ESTIMATE > c.ANNUAL_INCOME * 10 THEN 'High Saver'
                   WHEN c.NET_WORTH_ESTIMATE > c.ANNUAL_INCOME * 5 THEN 'Moderate Saver'
                   ELSE 'Active Spender'
               END AS SAVINGS_BEHAVIOR
        FROM CLIENTS c
        LEFT JOIN client_portfolio_summary cps ON c.CLIENT_ID = cps.CLIENT_ID
    )
    SELECT ca.CLIENT_ID, ca.FIRST_NAME, ca.LAST_NAME, ca.NET_WORTH_ESTIMATE,
           ca.RISK_TOLERANCE, ca.TOTAL_AUM,
           CASE
               WHEN ca.NUM_PORTFOLIOS IS NULL OR ca.NUM_PORTFOLIOS = 0 THEN 'Portfolio Setup'
               WHEN ca.TOTAL_AUM < ca.NET_WORTH_ESTIMATE * 0.1 THEN 'Investment Advisory'
               WHEN ca.AGE > 55 AND ca.RISK_TOLERANCE = 'Aggressive Growth' THEN 'Risk Adjustment'
               WHEN ca.LIFE_EVENT IS NOT NULL THEN 'Life Event Planning'
               WHEN ca.SAVINGS_BEHAVIOR = 'High Saver' THEN 'Alternative Investments'
               WHEN ca.NET_WORTH_ESTIMATE > 5000000 THEN 'Private Banking'
               ELSE 'Portfolio Review'
           END AS RECOMMENDED_ACTION,
           CASE
               WHEN ca.NET_WORTH_ESTIMATE > 10000000 THEN 'High'
               WHEN ca.NET_WORTH_ESTIMATE > 1000000 THEN 'Medium'
               ELSE 'Low'
           END AS PRIORITY,
           CASE
               WHEN ca.NET_WORTH_ESTIMATE > 10000000 THEN ca.NET_WORTH_ESTIMATE * 0.02
               WHEN ca.NET_WORTH_ESTIMATE > 1000000 THEN ca.NET_WORTH_ESTIMATE * 0.015
               ELSE ca.NET_WORTH_ESTIMATE * 0.01
           END AS ESTIMATED_REVENUE_IMPACT
    FROM client_analysis ca
    ORDER BY ca.NET_WORTH_ESTIMATE DESC
"#;

/// Only High and Medium risk clients are returned.
pub const CHURN_EARLY_WARNING: &str = r#"
    WITH client_portfolio_values AS (
        SELECT p.CLIENT_ID,
               SUM(ph.MARKET_VALUE) AS CURRENT_PORTFOLIO_VALUE
        FROM PORTFOLIOS p
        JOIN POSITION_HISTORY ph ON p.PORTFOLIO_ID = ph.PORTFOLIO_ID
        WHERE ph.TIMESTAMP = (
            SELECT MAX(TIMESTAMP) FROM POSITION_HISTORY ph2
            WHERE ph2.PORTFOLIO_ID = ph.PORTFOLIO_ID
        )
        GROUP BY 1
    ),
    historical_values AS (
        SELECT p.CLIENT_ID,
               AVG(ph.MARKET_VALUE) AS AVG_HISTORICAL_VALUE
        FROM PORTFOLIOS p
        JOIN POSITION_HISTORY ph ON p.PORTFOLIO_ID = ph.PORTFOLIO_ID
        WHERE ph.TIMESTAMP <= DATEADD(DAY, -90, CURRENT_DATE)
        GROUP BY 1
    ),
    interaction_analysis AS (
        SELECT i.CLIENT_ID,
               COUNT(DISTINCT i.INTERACTION_ID) AS INTERACTIONS_LAST_90_DAYS,
               MAX(i.TIMESTAMP) AS LAST_INTERACTION,
               DATEDIFF(DAY, MAX(i.TIMESTAMP), CURRENT_DATE) AS DAYS_SINCE_LAST_CONTACT
        FROM INTERACTIONS i
        WHERE i.TIMESTAMP >= DATEADD(DAY, -90, CURRENT_DATE)
        GROUP BY 1
    ),
    churn_analysis AS (
        SELECT c.CLIENT_ID, c.FIRST_NAME, c.LAST_NAME, c.NET_WORTH_ESTIMATE,
               cpv.CURRENT_PORTFOLIO_VALUE, hv.AVG_HISTORICAL_VALUE,
               ia.INTERACTIONS_LAST_90_DAYS, ia.DAYS_SINCE_LAST_CONTACT,
               CASE
                   WHEN cpv.CURRENT_PORTFOLIO_VALUE < hv.AVG_HISTORICAL_VALUE * 0.5 THEN 'Portfolio Decline'
                   WHEN ia.DAYS_SINCE_LAST_CONTACT > 180 THEN 'Communication Gap'
                   WHEN ia.INTERACTIONS_LAST_90_DAYS = 0 THEN 'Zero Engagement'
                   WHEN cpv.CURRENT_PORTFOLIO_VALUE < hv.AVG_HISTORICAL_VALUE * 0.8 THEN 'Moderate Decline'
                   ELSE 'Stable'
               END AS RISK_FACTOR,
               CASE
                   WHEN cpv.CURRENT_PORTFOLIO_VALUE < hv.AVG_HISTORICAL_VALUE * 0.5
                        OR ia.DAYS_SINCE_LAST_CONTACT > 180 THEN 'High'
                   WHEN cpv.CURRENT_PORTFOLIO_VALUE < hv.AVG_HISTORICAL_VALUE * 0.8
                        OR ia.INTERACTIONS_LAST_90_DAYS = 0 THEN 'Medium'
                   ELSE 'Low'
               END AS RISK_LEVEL
        FROM CLIENTS c
        LEFT JOIN client_portfolio_values cpv ON c.CLIENT_ID = cpv.CLIENT_ID
        LEFT JOIN historical_values hv ON c.CLIENT_ID = hv.CLIENT_ID
        LEFT JOIN interaction_analysis ia ON c.CLIENT_ID = ia.CLIENT_ID
    )
    SELECT * FROM churn_analysis
    WHERE RISK_LEVEL IN ('High', 'Medium')
    ORDER BY
        CASE RISK_LEVEL WHEN 'High' THEN 1 WHEN 'Medium' THEN 2 ELSE 3 END,
        NET_WORTH_ESTIMATE DESC
"#;

pub const EVENT_DRIVEN_OPPORTUNITIES: &str = r#"
    WITH recent_market_events AS (
        SELECT DISTINCT EVENT_ID, EVENT_NAME, IMPACT_TYPE, DESCRIPTION, START_DATE, END_DATE
        FROM MARKET_EVENTS
        WHERE START_DATE >= DATEADD(DAY, -90, CURRENT_DATE)
           OR END_DATE >= DATEADD(DAY, -90, CURRENT_DATE)
    ),
    client_impact AS (
        SELECT c.CLIENT_ID, c.FIRST_NAME, c.LAST_NAME,
               c.LIFE_EVENT, c.LAST_UPDATE_TIMESTAMP,
               MAX(i.TIMESTAMP) AS LAST_CONTACT,
               DATEDIFF(DAY, MAX(i.TIMESTAMP), CURRENT_DATE) AS DAYS_SINCE_CONTACT
        FROM CLIENTS c
        LEFT JOIN INTERACTIONS i ON c.CLIENT_ID = i.CLIENT_ID
        GROUP BY 1, 2, 3, 4, 5
    )
    SELECT ci.CLIENT_ID, ci.FIRST_NAME, ci.LAST_NAME,
           CASE
               WHEN ci.LIFE_EVENT IS NOT NULL
                    AND ci.LAST_UPDATE_TIMESTAMP >= DATEADD(DAY, -60, CURRENT_DATE) THEN 'Recent Life Event'
               WHEN ci.DAYS_SINCE_CONTACT > 90 THEN 'Long-term Re-engagement'
               WHEN EXISTS (SELECT 1 FROM recent_market_events) THEN 'Market Event Follow-up'
               ELSE 'Regular Check-in'
           END AS OUTREACH_TYPE,
           ci.LIFE_EVENT,
           ci.LAST_UPDATE_TIMESTAMP AS LIFE_EVENT_DATE,
           ci.LAST_CONTACT,
           ci.DAYS_SINCE_CONTACT,
           CASE
               WHEN ci.LIFE_EVENT IN ('Marriage', 'Birth of Child', 'Retirement') THEN 'High'
               WHEN ci.DAYS_SINCE_CONTACT > 180 THEN 'High'
               WHEN ci.DAYS_SINCE_CONTACT > 90 THEN 'Medium'
               ELSE 'Low'
           END AS PRIORITY,
           CASE
               WHEN ci.LIFE_EVENT = 'Marriage' THEN 'Joint account setup, beneficiary updates'
               WHEN ci.LIFE_EVENT = 'Birth of Child' THEN 'Education savings, life insurance review'
               WHEN ci.LIFE_EVENT = 'Retirement' THEN 'Income planning, asset allocation review'
               WHEN ci.DAYS_SINCE_CONTACT > 180 THEN 'Relationship health check, portfolio review'
               ELSE 'Market update, investment opportunities'
           END AS SUGGESTED_DISCUSSION_TOPICS
    FROM client_impact ci
    WHERE ci.LIFE_EVENT IS NOT NULL OR ci.DAYS_SINCE_CONTACT > 60
    ORDER BY
        CASE PRIORITY WHEN 'High' THEN 1 WHEN 'Medium' THEN 2 ELSE 3 END,
        ci.DAYS_SINCE_CONTACT DESC
"#;

/// Keyword sentiment over interaction notes from the last 30 days.
pub const SENTIMENT_ANALYSIS: &str = r#"
    WITH recent_interactions AS (
        SELECT i.INTERACTION_ID, i.CLIENT_ID, i.ADVISOR_ID, i.TIMESTAMP,
               i.TYPE, i.CHANNEL, i.OUTCOME_NOTES,
               c.FIRST_NAME, c.LAST_NAME
        FROM INTERACTIONS i
        JOIN CLIENTS c ON i.CLIENT_ID = c.CLIENT_ID
        WHERE i.TIMESTAMP >= DATEADD(DAY, -30, CURRENT_DATE)
          AND i.OUTCOME_NOTES IS NOT NULL
    )
    SELECT ri.INTERACTION_ID, ri.CLIENT_ID, ri.FIRST_NAME, ri.LAST_NAME,
           ri.ADVISOR_ID, ri.TIMESTAMP, ri.TYPE, ri.CHANNEL,
           ri.OUTCOME_NOTES,
           CASE
               WHEN LOWER(ri.OUTCOME_NOTES) LIKE '%complaint%' OR LOWER(ri.OUTCOME_NOTES) LIKE '%issue%' THEN 'Negative'
               WHEN LOWER(ri.OUTCOME_NOTES) LIKE '%satisfied%' OR LOWER(ri.OUTCOME_NOTES) LIKE '%happy%' THEN 'Positive'
               WHEN LOWER(ri.OUTCOME_NOTES) LIKE '%neutral%' OR LOWER(ri.OUTCOME_NOTES) LIKE '%okay%' THEN 'Neutral'
               WHEN LOWER(ri.OUTCOME_NOTES) LIKE '%concern%' OR LOWER(ri.OUTCOME_NOTES) LIKE '%worry%' THEN 'Negative'
               WHEN LOWER(ri.OUTCOME_NOTES) LIKE '%excellent%' OR LOWER(ri.OUTCOME_NOTES) LIKE '%great%' THEN 'Positive'
               ELSE 'Neutral'
           END AS SENTIMENT_SCORE,
           CASE
               WHEN LOWER(ri.OUTCOME_NOTES) LIKE '%urgent%' OR LOWER(ri.OUTCOME_NOTES) LIKE '%escalate%' THEN 'High'
               WHEN LOWER(ri.OUTCOME_NOTES) LIKE '%follow%' OR LOWER(ri.OUTCOME_NOTES) LIKE '%review%' THEN 'Medium'
               ELSE 'Low'
           END AS PRIORITY_LEVEL
    FROM recent_interactions ri
    ORDER BY ri.TIMESTAMP DESC
"#;

pub const SUITABILITY_RISK_ALERTS: &str = r#"
    WITH client_portfolio_values AS (
        SELECT p.CLIENT_ID, p.PORTFOLIO_ID, p.STRATEGY_TYPE,
               SUM(ph.MARKET_VALUE) AS TOTAL_PORTFOLIO_VALUE
        FROM PORTFOLIOS p
        JOIN POSITION_HISTORY ph ON p.PORTFOLIO_ID = ph.PORTFOLIO_ID
        WHERE ph.TIMESTAMP = (
            SELECT MAX(TIMESTAMP) FROM POSITION_HISTORY ph2
            WHERE ph2.PORTFOLIO_ID = ph.PORTFOLIO_ID
        )
        GROUP BY 1, 2, 3
    ),
    risk_misalignment AS (
        SELECT c.CLIENT_ID, c.FIRST_NAME, c.LAST_NAME, c.RISK_TOLERANCE,
               cpv.PORTFOLIO_ID, cpv.STRATEGY_TYPE, cpv.TOTAL_PORTFOLIO_VALUE,
               CASE
                   WHEN c.RISK_TOLERANCE = 'Conservative'
                        AND cpv.STRATEGY_TYPE NOT IN ('Conservative', 'Balanced') THEN 'Too Aggressive'
                   WHEN c.RISK_TOLERANCE = 'Aggressive Growth'
                        AND cpv.STRATEGY_TYPE IN ('Conservative', 'Balanced') THEN 'Too Conservative'
                   WHEN c.RISK_TOLERANCE = 'Moderate'
                        AND cpv.STRATEGY_TYPE IN ('Aggressive Growth') THEN 'Too Aggressive'
                   WHEN c.RISK_TOLERANCE = 'Growth'
                        AND cpv.STRATEGY_TYPE = 'Conservative' THEN 'Too Conservative'
                   ELSE 'Aligned'
               END AS ALIGNMENT_STATUS
        FROM CLIENTS c
        JOIN client_portfolio_values cpv ON c.CLIENT_ID = cpv.CLIENT_ID
    )
    SELECT rm.CLIENT_ID, rm.FIRST_NAME, rm.LAST_NAME, rm.RISK_TOLERANCE,
           rm.PORTFOLIO_ID, rm.STRATEGY_TYPE, rm.TOTAL_PORTFOLIO_VALUE,
           rm.ALIGNMENT_STATUS,
           CASE
               WHEN rm.ALIGNMENT_STATUS = 'Too Aggressive' THEN 'High'
               WHEN rm.ALIGNMENT_STATUS = 'Too Conservative' THEN 'Medium'
               ELSE 'Low'
           END AS ALERT_LEVEL
    FROM risk_misalignment rm
    WHERE rm.ALIGNMENT_STATUS <> 'Aligned'
    ORDER BY rm.TOTAL_PORTFOLIO_VALUE DESC
"#;

/// Asset-class weights more than 3 percentage points away from the
/// strategy's target allocation.
pub const PORTFOLIO_DRIFT: &str = r#"
    WITH target_allocations AS (
        SELECT 'Conservative' AS STRATEGY_TYPE, 'Equities' AS ASSET_CLASS, 30 AS TARGET_PCT
        UNION ALL SELECT 'Conservative', 'Fixed Income', 60
        UNION ALL SELECT 'Conservative', 'Cash', 10
        UNION ALL SELECT 'Balanced', 'Equities', 50
        UNION ALL SELECT 'Balanced', 'Fixed Income', 40
        UNION ALL SELECT 'Balanced', 'Cash', 10
        UNION ALL SELECT 'Growth', 'Equities', 70
        UNION ALL SELECT 'Growth', 'Fixed Income', 25
        UNION ALL SELECT 'Growth', 'Cash', 5
        UNION ALL SELECT 'Aggressive Growth', 'Equities', 85
        UNION ALL SELECT 'Aggressive Growth', 'Fixed Income', 10
        UNION ALL SELECT 'Aggressive Growth', 'Cash', 5
    ),
    current_allocations AS (
        SELECT p.PORTFOLIO_ID, p.STRATEGY_TYPE,
               ph.ASSET_CLASS,
               SUM(ph.MARKET_VALUE) AS CURRENT_VALUE,
               SUM(SUM(ph.MARKET_VALUE)) OVER (PARTITION BY p.PORTFOLIO_ID) AS TOTAL_PORTFOLIO_VALUE,
               ROUND(SUM(ph.MARKET_VALUE)
                     / SUM(SUM(ph.MARKET_VALUE)) OVER (PARTITION BY p.PORTFOLIO_ID) * 100, 2) AS CURRENT_PCT
        FROM PORTFOLIOS p
        JOIN POSITION_HISTORY ph ON p.PORTFOLIO_ID = ph.PORTFOLIO_ID
        WHERE ph.TIMESTAMP = (
            SELECT MAX(TIMESTAMP) FROM POSITION_HISTORY ph2
            WHERE ph2.PORTFOLIO_ID = ph.PORTFOLIO_ID
        )
        GROUP BY 1, 2, 3
    ),
    drift_analysis AS (
        SELECT ca.PORTFOLIO_ID, ca.STRATEGY_TYPE, ca.ASSET_CLASS,
               ca.CURRENT_PCT, ta.TARGET_PCT,
               ABS(ca.CURRENT_PCT - ta.TARGET_PCT) AS DRIFT_PCT,
               ca.CURRENT_VALUE, ca.TOTAL_PORTFOLIO_VALUE
        FROM current_allocations ca
        JOIN target_allocations ta ON ca.STRATEGY_TYPE = ta.STRATEGY_TYPE
                                  AND ca.ASSET_CLASS = ta.ASSET_CLASS
    )
    SELECT da.PORTFOLIO_ID, da.STRATEGY_TYPE, da.ASSET_CLASS,
           da.CURRENT_PCT, da.TARGET_PCT, da.DRIFT_PCT,
           da.CURRENT_VALUE, da.TOTAL_PORTFOLIO_VALUE,
           CASE
               WHEN da.DRIFT_PCT > 10 THEN 'High'
               WHEN da.DRIFT_PCT > 5 THEN 'Medium'
               ELSE 'Low'
           END AS DRIFT_LEVEL
    FROM drift_analysis da
    WHERE da.DRIFT_PCT > 3
    ORDER BY da.DRIFT_PCT DESC
"#;

pub const IDLE_CASH: &str = r#"
    WITH cash_positions AS (
        SELECT p.PORTFOLIO_ID, p.CLIENT_ID, p.STRATEGY_TYPE,
               ph.MARKET_VALUE AS CASH_BALANCE,
               SUM(ph2.MARKET_VALUE) AS TOTAL_PORTFOLIO_VALUE
        FROM PORTFOLIOS p
        JOIN POSITION_HISTORY ph ON p.PORTFOLIO_ID = ph.PORTFOLIO_ID
        JOIN POSITION_HISTORY ph2 ON p.PORTFOLIO_ID = ph2.PORTFOLIO_ID
        WHERE ph.TICKER = 'CASH'
          AND ph.TIMESTAMP = (SELECT MAX(TIMESTAMP) FROM POSITION_HISTORY WHERE PORTFOLIO_ID = ph.PORTFOLIO_ID)
          AND ph2.TIMESTAMP = ph.TIMESTAMP
        GROUP BY 1, 2, 3, 4
    )
    SELECT cp.PORTFOLIO_ID, cp.CLIENT_ID, cp.STRATEGY_TYPE,
           cp.CASH_BALANCE, cp.TOTAL_PORTFOLIO_VALUE,
           ROUND(cp.CASH_BALANCE / cp.TOTAL_PORTFOLIO_VALUE * 100, 2) AS CASH_PERCENTAGE,
           c.FIRST_NAME, c.LAST_NAME, c.RISK_TOLERANCE,
           CASE
               WHEN cp.CASH_BALANCE > 100000 AND cp.CASH_BALANCE / cp.TOTAL_PORTFOLIO_VALUE > 0.15 THEN 'High Priority'
               WHEN cp.CASH_BALANCE > 50000 AND cp.CASH_BALANCE / cp.TOTAL_PORTFOLIO_VALUE > 0.10 THEN 'Medium Priority'
               WHEN cp.CASH_BALANCE > 25000 AND cp.CASH_BALANCE / cp.TOTAL_PORTFOLIO_VALUE > 0.05 THEN 'Low Priority'
               ELSE 'Acceptable'
           END AS SWEEP_PRIORITY,
           ROUND(cp.CASH_BALANCE * 0.04, 2) AS POTENTIAL_ANNUAL_INCOME
    FROM cash_positions cp
    JOIN CLIENTS c ON cp.CLIENT_ID = c.CLIENT_ID
    WHERE cp.CASH_BALANCE > 10000
    ORDER BY cp.CASH_BALANCE DESC
"#;

pub const TRADE_FEE_ANOMALIES: &str = r#"
    WITH transaction_stats AS (
        SELECT TRANSACTION_TYPE,
               AVG(TOTAL_AMOUNT) AS AVG_AMOUNT,
               STDDEV(TOTAL_AMOUNT) AS STDDEV_AMOUNT,
               COUNT(*) AS TRANSACTION_COUNT,
               PERCENTILE_CONT(0.95) WITHIN GROUP (ORDER BY TOTAL_AMOUNT) AS P95_AMOUNT
        FROM TRANSACTIONS
        WHERE TOTAL_AMOUNT > 0
        GROUP BY 1
    ),
    portfolio_clients AS (
        SELECT p.PORTFOLIO_ID, p.CLIENT_ID
        FROM PORTFOLIOS p
    ),
    anomalies AS (
        SELECT t.TRANSACTION_ID, pc.CLIENT_ID, t.PORTFOLIO_ID,
               t.TRANSACTION_TYPE, t.TOTAL_AMOUNT, t.QUANTITY, t.PRICE,
               t.TIMESTAMP, t.TICKER,
               ts.AVG_AMOUNT, ts.STDDEV_AMOUNT, ts.P95_AMOUNT,
               CASE
                   WHEN t.TOTAL_AMOUNT > ts.P95_AMOUNT * 2 THEN 'Unusually Large Transaction'
                   WHEN t.TOTAL_AMOUNT > ts.AVG_AMOUNT + 3 * ts.STDDEV_AMOUNT THEN 'Statistical Outlier - High Value'
                   WHEN t.PRICE = 0 AND t.TOTAL_AMOUNT > 0 THEN 'Zero Price with Value'
                   WHEN t.QUANTITY = 0 AND t.TOTAL_AMOUNT > 0 THEN 'Zero Quantity with Value'
                   WHEN t.TOTAL_AMOUNT > 1000000 AND t.TRANSACTION_TYPE = 'Buy' THEN 'Large Buy Transaction'
                   WHEN ABS(t.TOTAL_AMOUNT - (t.QUANTITY * t.PRICE)) > t.TOTAL_AMOUNT * 0.05 THEN 'Price-Quantity Mismatch'
                   ELSE 'Normal'
               END AS ANOMALY_TYPE
        FROM TRANSACTIONS t
        LEFT JOIN transaction_stats ts ON t.TRANSACTION_TYPE = ts.TRANSACTION_TYPE
        LEFT JOIN portfolio_clients pc ON t.PORTFOLIO_ID = pc.PORTFOLIO_ID
        WHERE t.TIMESTAMP >= DATEADD(DAY, -90, CURRENT_DATE)
    )
    SELECT a.TRANSACTION_ID, a.CLIENT_ID, a.PORTFOLIO_ID,
           a.TRANSACTION_TYPE, a.TOTAL_AMOUNT, a.QUANTITY, a.PRICE,
           a.TIMESTAMP, a.TICKER, a.ANOMALY_TYPE,
           c.FIRST_NAME, c.LAST_NAME,
           ROUND((a.TOTAL_AMOUNT / NULLIF(a.AVG_AMOUNT, 0) - 1) * 100, 2) AS DEVIATION_FROM_AVG_PCT,
           ROUND(a.TOTAL_AMOUNT - a.AVG_AMOUNT, 2) AS AMOUNT_DIFFERENCE
    FROM anomalies a
    LEFT JOIN CLIENTS c ON a.CLIENT_ID = c.CLIENT_ID
    WHERE a.ANOMALY_TYPE <> 'Normal'
    ORDER BY a.TIMESTAMP DESC
"#;

/// Binds: (1) interaction window in days.
pub const ADVISOR_PRODUCTIVITY: &str = r#"
    WITH client_portfolio_values AS (
        SELECT p.CLIENT_ID,
               SUM(ph.MARKET_VALUE) AS TOTAL_PORTFOLIO_VALUE
        FROM PORTFOLIOS p
        JOIN POSITION_HISTORY ph ON p.PORTFOLIO_ID = ph.PORTFOLIO_ID
        WHERE ph.TIMESTAMP = (
            SELECT MAX(TIMESTAMP) FROM POSITION_HISTORY ph2
            WHERE ph2.PORTFOLIO_ID = ph.PORTFOLIO_ID
        )
        GROUP BY 1
    ),
    advisor_metrics AS (
        SELECT a.ADVISOR_ID, a.NAME AS ADVISOR_NAME, a.SPECIALIZATION, a.EXPERIENCE_YEARS,
               COUNT(DISTINCT acr.CLIENT_ID) AS TOTAL_CLIENTS,
               COALESCE(SUM(cpv.TOTAL_PORTFOLIO_VALUE), 0) AS TOTAL_AUM,
               COUNT(DISTINCT i.INTERACTION_ID) AS TOTAL_INTERACTIONS,
               COUNT(DISTINCT CASE WHEN i.TIMESTAMP >= DATEADD(DAY, -1 * ?, CURRENT_DATE)
                                   THEN i.INTERACTION_ID END) AS RECENT_INTERACTIONS
        FROM ADVISORS a
        LEFT JOIN ADVISOR_CLIENT_RELATIONSHIPS acr ON a.ADVISOR_ID = acr.ADVISOR_ID
        LEFT JOIN client_portfolio_values cpv ON acr.CLIENT_ID = cpv.CLIENT_ID
        LEFT JOIN INTERACTIONS i ON a.ADVISOR_ID = i.ADVISOR_ID
        GROUP BY 1, 2, 3, 4
    )
    SELECT am.ADVISOR_ID, am.ADVISOR_NAME, am.SPECIALIZATION, am.EXPERIENCE_YEARS,
           am.TOTAL_CLIENTS, am.TOTAL_AUM, am.TOTAL_INTERACTIONS, am.RECENT_INTERACTIONS,
           ROUND(am.TOTAL_AUM / NULLIF(am.TOTAL_CLIENTS, 0), 2) AS AUM_PER_CLIENT,
           ROUND(am.RECENT_INTERACTIONS / NULLIF(am.TOTAL_CLIENTS, 0), 2) AS INTERACTIONS_PER_CLIENT
    FROM advisor_metrics am
    ORDER BY am.TOTAL_AUM DESC
"#;

/// Binds: (1) client id.
pub const CLIENT_OVERVIEW: &str = r#"
    SELECT c.CLIENT_ID, c.FIRST_NAME, c.LAST_NAME, c.RISK_TOLERANCE,
           c.NET_WORTH_ESTIMATE, c.LIFE_EVENT, c.LAST_UPDATE_TIMESTAMP AS LIFE_EVENT_DATE,
           COUNT(DISTINCT p.PORTFOLIO_ID) AS NUM_PORTFOLIOS,
           COUNT(DISTINCT acr.ADVISOR_ID) AS NUM_ADVISORS
    FROM CLIENTS c
    LEFT JOIN PORTFOLIOS p ON c.CLIENT_ID = p.CLIENT_ID
    LEFT JOIN ADVISOR_CLIENT_RELATIONSHIPS acr ON c.CLIENT_ID = acr.CLIENT_ID
    WHERE c.CLIENT_ID = ?
    GROUP BY 1, 2, 3, 4, 5, 6, 7
"#;

/// Binds: (1) client id.
pub const CLIENT_PORTFOLIOS: &str = r#"
    WITH portfolio_values AS (
        SELECT p.PORTFOLIO_ID, p.STRATEGY_TYPE,
               SUM(ph.MARKET_VALUE) AS CURRENT_VALUE
        FROM PORTFOLIOS p
        JOIN POSITION_HISTORY ph ON p.PORTFOLIO_ID = ph.PORTFOLIO_ID
        WHERE p.CLIENT_ID = ?
          AND ph.TIMESTAMP = (
              SELECT MAX(TIMESTAMP) FROM POSITION_HISTORY ph2
              WHERE ph2.PORTFOLIO_ID = ph.PORTFOLIO_ID
          )
        GROUP BY 1, 2
    )
    SELECT * FROM portfolio_values
    ORDER BY CURRENT_VALUE DESC
"#;

pub const KYC_INSIGHTS: &str = r#"
    WITH client_compliance AS (
        SELECT c.CLIENT_ID, c.FIRST_NAME, c.LAST_NAME, c.DATE_JOINED,
               c.LAST_UPDATE_TIMESTAMP,
               DATEDIFF(DAY, c.LAST_UPDATE_TIMESTAMP, CURRENT_DATE) AS DAYS_SINCE_UPDATE,
               CASE
                   WHEN DATEDIFF(DAY, c.LAST_UPDATE_TIMESTAMP, CURRENT_DATE) > 365 THEN 'Annual Review Required'
                   WHEN DATEDIFF(DAY, c.LAST_UPDATE_TIMESTAMP, CURRENT_DATE) > 180 THEN 'Semi-Annual Check'
                   WHEN c.LIFE_EVENT IS NOT NULL
                        AND c.LAST_UPDATE_TIMESTAMP >= DATEADD(DAY, -30, CURRENT_DATE) THEN 'Life Event Update'
                   ELSE 'Current'
               END AS COMPLIANCE_STATUS
        FROM CLIENTS c
    )
    SELECT cc.CLIENT_ID, cc.FIRST_NAME, cc.LAST_NAME, cc.DATE_JOINED,
           cc.LAST_UPDATE_TIMESTAMP, cc.DAYS_SINCE_UPDATE, cc.COMPLIANCE_STATUS,
           CASE
               WHEN cc.COMPLIANCE_STATUS = 'Annual Review Required' THEN 'High'
               WHEN cc.COMPLIANCE_STATUS = 'Semi-Annual Check' THEN 'Medium'
               WHEN cc.COMPLIANCE_STATUS = 'Life Event Update' THEN 'Medium'
               ELSE 'Low'
           END AS PRIORITY
    FROM client_compliance cc
    WHERE cc.COMPLIANCE_STATUS <> 'Current'
    ORDER BY cc.DAYS_SINCE_UPDATE DESC
"#;

pub const GEOGRAPHIC_DISTRIBUTION: &str = r#"
    WITH client_portfolio_values AS (
        SELECT p.CLIENT_ID,
               SUM(ph.MARKET_VALUE) AS TOTAL_PORTFOLIO_VALUE
        FROM PORTFOLIOS p
        JOIN POSITION_HISTORY ph ON p.PORTFOLIO_ID = ph.PORTFOLIO_ID
        WHERE ph.TIMESTAMP = (
            SELECT MAX(TIMESTAMP) FROM POSITION_HISTORY ph2
            WHERE ph2.PORTFOLIO_ID = ph.PORTFOLIO_ID
        )
        GROUP BY 1
    ),
    client_aum AS (
        SELECT c.CLIENT_ID, c.FIRST_NAME, c.LAST_NAME, c.CITY, c.STATE, c.ZIP_CODE,
               c.NET_WORTH_ESTIMATE, c.ANNUAL_INCOME, c.RISK_TOLERANCE,
               COALESCE(cpv.TOTAL_PORTFOLIO_VALUE, 0) AS PORTFOLIO_VALUE
        FROM CLIENTS c
        LEFT JOIN client_portfolio_values cpv ON c.CLIENT_ID = cpv.CLIENT_ID
    ),
    state_metrics AS (
        SELECT STATE,
               COUNT(DISTINCT CLIENT_ID) AS CLIENT_COUNT,
               SUM(PORTFOLIO_VALUE) AS TOTAL_AUM,
               AVG(PORTFOLIO_VALUE) AS AVG_AUM_PER_CLIENT,
               SUM(NET_WORTH_ESTIMATE) AS TOTAL_NET_WORTH,
               AVG(ANNUAL_INCOME) AS AVG_INCOME,
               COUNT(CASE WHEN RISK_TOLERANCE = 'Aggressive Growth' THEN 1 END) AS AGGRESSIVE_CLIENTS,
               COUNT(CASE WHEN RISK_TOLERANCE = 'Conservative' THEN 1 END) AS CONSERVATIVE_CLIENTS
        FROM client_aum
        WHERE STATE IS NOT NULL
        GROUP BY 1
    )
    SELECT sm.*,
           ROUND(sm.TOTAL_AUM / NULLIF(sm.CLIENT_COUNT, 0), 2) AS AUM_PER_CLIENT,
           ROUND(sm.AGGRESSIVE_CLIENTS::FLOAT / NULLIF(sm.CLIENT_COUNT, 0) * 100, 1) AS PCT_AGGRESSIVE,
           ROUND(sm.CONSERVATIVE_CLIENTS::FLOAT / NULLIF(sm.CLIENT_COUNT, 0) * 100, 1) AS PCT_CONSERVATIVE,
           CASE
               WHEN sm.TOTAL_AUM > 50000000 THEN 'High Value Market'
               WHEN sm.TOTAL_AUM > 20000000 THEN 'Medium Value Market'
               ELSE 'Emerging Market'
           END AS MARKET_TIER
    FROM state_metrics sm
    ORDER BY sm.TOTAL_AUM DESC
"#;
