//! Small builders on top of `sqlx::QueryBuilder` shared by every record type.
//!
//! All values are bound as parameters; only column names and fixed SQL
//! fragments supplied by the code itself are pushed as text.

use sqlx::{Encode, Postgres, QueryBuilder, Type};

pub type PgQuery = QueryBuilder<'static, Postgres>;

/// WHERE/AND chain. The first condition emits ` WHERE `, later ones ` AND `.
pub struct Conditions<'a> {
    qb: &'a mut PgQuery,
    started: bool,
}

impl<'a> Conditions<'a> {
    pub fn new(qb: &'a mut PgQuery) -> Self {
        Self { qb, started: false }
    }

    fn next(&mut self) -> &mut PgQuery {
        self.qb.push(if self.started { " AND " } else { " WHERE " });
        self.started = true;
        &mut *self.qb
    }

    pub fn cmp<T>(&mut self, column: &str, op: &str, value: T) -> &mut Self
    where
        T: Encode<'static, Postgres> + Type<Postgres> + Send + 'static,
    {
        self.next()
            .push(column)
            .push(" ")
            .push(op)
            .push(" ")
            .push_bind(value);
        self
    }

    pub fn eq<T>(&mut self, column: &str, value: T) -> &mut Self
    where
        T: Encode<'static, Postgres> + Type<Postgres> + Send + 'static,
    {
        self.cmp(column, "=", value)
    }

    pub fn cmp_some<T>(&mut self, column: &str, op: &str, value: Option<T>) -> &mut Self
    where
        T: Encode<'static, Postgres> + Type<Postgres> + Send + 'static,
    {
        if let Some(value) = value {
            self.cmp(column, op, value);
        }
        self
    }

    pub fn eq_some<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: Encode<'static, Postgres> + Type<Postgres> + Send + 'static,
    {
        self.cmp_some(column, "=", value)
    }

    /// Pushes a fixed predicate with no bound values, e.g. `NOT read`.
    pub fn raw(&mut self, predicate: &'static str) -> &mut Self {
        self.next().push(predicate);
        self
    }
}

/// Comma-separated `column = $n` list for an UPDATE statement.
pub struct Assignments<'a> {
    qb: &'a mut PgQuery,
    count: usize,
}

impl<'a> Assignments<'a> {
    pub fn new(qb: &'a mut PgQuery) -> Self {
        Self { qb, count: 0 }
    }

    pub fn set<T>(&mut self, column: &str, value: T) -> &mut Self
    where
        T: Encode<'static, Postgres> + Type<Postgres> + Send + 'static,
    {
        if self.count > 0 {
            self.qb.push(", ");
        }
        self.qb.push(column).push(" = ").push_bind(value);
        self.count += 1;
        self
    }

    /// Sets the column only when the patch carries a value for it.
    /// For nullable columns pass an `Option<Option<T>>`: `Some(None)` binds NULL.
    pub fn set_some<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: Encode<'static, Postgres> + Type<Postgres> + Send + 'static,
    {
        if let Some(value) = value {
            self.set(column, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Closes the list with the `updated_at` bump every update carries.
    pub(crate) fn touch(&mut self) {
        if self.count > 0 {
            self.qb.push(", ");
        }
        self.qb.push("updated_at = NOW()");
    }
}

/// Comma-separated bound values for an INSERT statement.
pub struct Values<'a> {
    qb: &'a mut PgQuery,
    count: usize,
}

impl<'a> Values<'a> {
    pub fn new(qb: &'a mut PgQuery) -> Self {
        Self { qb, count: 0 }
    }

    pub fn bind<T>(&mut self, value: T) -> &mut Self
    where
        T: Encode<'static, Postgres> + Type<Postgres> + Send + 'static,
    {
        if self.count > 0 {
            self.qb.push(", ");
        }
        self.qb.push_bind(value);
        self.count += 1;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_chain_where_and() {
        let mut qb = PgQuery::new("SELECT * FROM goals");
        Conditions::new(&mut qb)
            .eq("user_id", "u1".to_string())
            .eq_some::<String>("status", None)
            .cmp("due_date", "<", chrono::NaiveDate::from_ymd_opt(2025, 1, 1))
            .raw("NOT archived");
        assert_eq!(
            qb.sql(),
            "SELECT * FROM goals WHERE user_id = $1 AND due_date < $2 AND NOT archived"
        );
    }

    #[test]
    fn test_conditions_empty_leaves_query_untouched() {
        let mut qb = PgQuery::new("SELECT * FROM goals");
        Conditions::new(&mut qb).eq_some::<String>("user_id", None);
        assert_eq!(qb.sql(), "SELECT * FROM goals");
    }

    #[test]
    fn test_assignments_skip_absent_and_touch() {
        let mut qb = PgQuery::new("UPDATE goals SET ");
        let mut set = Assignments::new(&mut qb);
        set.set_some("title", Some("Ship it".to_string()))
            .set_some::<String>("status", None)
            .set_some("notes", Some(None::<String>));
        assert!(!set.is_empty());
        set.touch();
        assert_eq!(
            qb.sql(),
            "UPDATE goals SET title = $1, notes = $2, updated_at = NOW()"
        );
    }

    #[test]
    fn test_values_separated() {
        let mut qb = PgQuery::new("INSERT INTO t (a, b) VALUES (");
        let mut values = Values::new(&mut qb);
        values.bind(1_i32).bind("x".to_string());
        qb.push(")");
        assert_eq!(qb.sql(), "INSERT INTO t (a, b) VALUES ($1, $2)");
    }
}
