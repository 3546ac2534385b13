//! Member repository contract and SQLite implementation.

use super::{row_exists, RepoResult};
use crate::model::member::{Member, MemberId, NewMember};
use rusqlite::{params, Connection, Row};

/// Repository interface for member persistence.
pub trait MemberRepository {
    fn create_member(&self, member: &NewMember) -> RepoResult<MemberId>;
    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>>;
    /// All members ordered by id.
    fn list_members(&self) -> RepoResult<Vec<Member>>;
    fn member_exists(&self, id: MemberId) -> RepoResult<bool>;
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create_member(&self, member: &NewMember) -> RepoResult<MemberId> {
        let member = member.clone().normalized()?;

        self.conn.execute(
            "INSERT INTO Member (full_name, email) VALUES (?1, ?2);",
            params![member.full_name.as_str(), member.email.as_deref()],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let mut stmt = self.conn.prepare(
            "SELECT member_id, full_name, email
             FROM Member
             WHERE member_id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_member_row(row)?));
        }
        Ok(None)
    }

    fn list_members(&self) -> RepoResult<Vec<Member>> {
        let mut stmt = self.conn.prepare(
            "SELECT member_id, full_name, email
             FROM Member
             ORDER BY member_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }
        Ok(members)
    }

    fn member_exists(&self, id: MemberId) -> RepoResult<bool> {
        row_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM Member WHERE member_id = ?1);",
            id,
        )
    }
}

fn parse_member_row(row: &Row<'_>) -> RepoResult<Member> {
    Ok(Member {
        id: row.get("member_id")?,
        full_name: row.get("full_name")?,
        email: row.get("email")?,
    })
}
