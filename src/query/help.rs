//! SQL help synthesis
//!
//! Keyword-dispatched static documentation passages. Like query synthesis
//! this never fails: unrecognized questions get the general primer.

type Matcher = fn(&str) -> bool;

/// Help topics, evaluated top to bottom; first match wins
const TOPICS: &[(Matcher, &str)] = &[
    (matches_join, JOIN_HELP),
    (matches_where, WHERE_HELP),
    (matches_group, GROUP_HELP),
    (matches_order, ORDER_HELP),
];

/// Answer a SQL concept question with a fixed explanatory passage
pub fn answer(question: &str) -> String {
    let lowered = question.to_lowercase();
    for (matches, passage) in TOPICS {
        if matches(&lowered) {
            return (*passage).to_string();
        }
    }
    GENERAL_HELP.to_string()
}

fn matches_join(q: &str) -> bool {
    q.contains("join")
}

fn matches_where(q: &str) -> bool {
    q.contains("where") || q.contains("filter")
}

fn matches_group(q: &str) -> bool {
    q.contains("group") || q.contains("aggregate")
}

fn matches_order(q: &str) -> bool {
    q.contains("order") || q.contains("sort")
}

const JOIN_HELP: &str = "\
SQL JOINs combine rows from two or more tables based on a related column between them.

Types of JOINs:
- INNER JOIN: Returns records that have matching values in both tables
- LEFT JOIN: Returns all records from the left table and matching records from the right table
- RIGHT JOIN: Returns all records from the right table and matching records from the left table
- FULL JOIN: Returns all records when there is a match in either left or right table

Example:
SELECT a.name, b.order_id
FROM customers a
INNER JOIN orders b ON a.customer_id = b.customer_id;";

const WHERE_HELP: &str = "\
The WHERE clause filters records based on specified conditions.

Operators:
- = (equal)
- != or <> (not equal)
- > (greater than)
- < (less than)
- >= (greater than or equal)
- <= (less than or equal)
- LIKE (pattern matching)
- IN (multiple values)
- BETWEEN (range)

Examples:
SELECT * FROM customers WHERE age > 25;
SELECT * FROM products WHERE price BETWEEN 10 AND 100;
SELECT * FROM users WHERE name LIKE 'John%';";

const GROUP_HELP: &str = "\
GROUP BY groups rows that have the same values in specified columns.

Common aggregate functions:
- COUNT(): Counts rows
- SUM(): Sums values
- AVG(): Calculates average
- MAX(): Finds maximum value
- MIN(): Finds minimum value

Example:
SELECT department, COUNT(*) as employee_count, AVG(salary) as avg_salary
FROM employees
GROUP BY department;";

const ORDER_HELP: &str = "\
ORDER BY sorts the result set in ascending or descending order.

Syntax:
SELECT column1, column2 FROM table_name ORDER BY column1 ASC|DESC;

Examples:
SELECT * FROM products ORDER BY price DESC;  -- Highest to lowest
SELECT * FROM customers ORDER BY name ASC;   -- A to Z
SELECT * FROM orders ORDER BY date DESC, amount ASC;  -- Multiple columns";

const GENERAL_HELP: &str = "\
SQL (Structured Query Language) is used to manage and manipulate relational databases.

Common SQL commands:
- SELECT: Retrieve data
- INSERT: Add new records
- UPDATE: Modify existing records
- DELETE: Remove records
- CREATE: Create new tables/databases
- ALTER: Modify table structure
- DROP: Delete tables/databases

Basic SELECT syntax:
SELECT column1, column2 FROM table_name WHERE condition ORDER BY column1;";
