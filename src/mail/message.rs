use mailparse::{DispositionType, MailHeaderMap, ParsedMail};
use std::fs;
use std::path::Path;

use crate::mail::date::MailDate;
use crate::mail::{MailError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// One message file, parsed. Headers keep their file order and duplicates.
#[derive(Clone, Debug, Default)]
pub struct ParsedMessage {
    pub from: Option<String>,
    pub to: Option<String>,
    pub subject: Option<String>,
    pub date: Option<MailDate>,
    pub headers: Vec<Header>,
    pub text_plain: Vec<String>,
    pub text_html: Vec<String>,
}

impl ParsedMessage {
    pub fn parse(path: &Path) -> Result<Self> {
        let raw = fs::read(path).map_err(|source| MailError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(MailError::NotAMessage(path.to_path_buf()));
        }

        let mail = mailparse::parse_mail(&raw).map_err(|source| MailError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::from_mail(&mail))
    }

    fn from_mail(mail: &ParsedMail) -> Self {
        let headers = mail
            .headers
            .iter()
            .map(|h| Header {
                name: h.get_key(),
                value: h.get_value(),
            })
            .collect();

        let mut msg = ParsedMessage {
            from: mail.headers.get_first_value("From"),
            to: mail.headers.get_first_value("To"),
            subject: mail.headers.get_first_value("Subject"),
            date: mail
                .headers
                .get_first_value("Date")
                .map(|v| MailDate::from_header(&v)),
            headers,
            ..Default::default()
        };
        collect_text_parts(mail, &mut msg);
        msg
    }
}

fn collect_text_parts(m: &ParsedMail, msg: &mut ParsedMessage) {
    if !m.subparts.is_empty() {
        for sp in &m.subparts {
            collect_text_parts(sp, msg);
        }
        return;
    }

    if matches!(m.get_content_disposition().disposition, DispositionType::Attachment) {
        return;
    }

    let ctype = m.ctype.mimetype.to_lowercase();
    let target = match ctype.as_str() {
        "text/plain" => &mut msg.text_plain,
        "text/html" => &mut msg.text_html,
        _ => return,
    };

    match m.get_body() {
        Ok(body) => target.push(body),
        Err(e) => log::debug!("skipping undecodable {ctype} part: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse_str(raw: &str) -> ParsedMessage {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("msg");
        fs::write(&path, raw).unwrap();
        ParsedMessage::parse(&path).unwrap()
    }

    #[test]
    fn simple_plain_message() {
        let m = parse_str(
            "From: Alice <alice@example.org>\r\n\
             To: bob@example.org\r\n\
             Subject: Test\r\n\
             Date: Tue, 01 Jan 2030 09:30:00 +0000\r\n\
             \r\n\
             Hello\r\n",
        );
        assert_eq!(m.from.as_deref(), Some("Alice <alice@example.org>"));
        assert_eq!(m.to.as_deref(), Some("bob@example.org"));
        assert_eq!(m.subject.as_deref(), Some("Test"));
        assert!(matches!(m.date, Some(MailDate::Parsed(_))));
        assert_eq!(m.text_plain.len(), 1);
        assert_eq!(m.text_plain[0].trim_end(), "Hello");
        assert!(m.text_html.is_empty());
    }

    #[test]
    fn duplicate_and_unusual_headers_are_kept_in_order() {
        let m = parse_str(
            "Received: from a\n\
             Received: from b\n\
             X-Dovecot-Thing: 42\n\
             Subject: hi\n\
             \n\
             body\n",
        );
        let names: Vec<&str> = m.headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Received", "Received", "X-Dovecot-Thing", "Subject"]);
        assert_eq!(m.headers[0].value, "from a");
        assert_eq!(m.headers[1].value, "from b");
        assert!(m.from.is_none());
        assert!(m.date.is_none());
    }

    #[test]
    fn encoded_subject_is_decoded() {
        let m = parse_str("Subject: =?UTF-8?B?SGFsbMOz?=\n\nx\n");
        assert_eq!(m.subject.as_deref(), Some("Halló"));
    }

    #[test]
    fn multipart_alternative_collects_both_kinds() {
        let m = parse_str(
            "Subject: alt\n\
             MIME-Version: 1.0\n\
             Content-Type: multipart/alternative; boundary=\"XX\"\n\
             \n\
             --XX\n\
             Content-Type: text/plain; charset=utf-8\n\
             \n\
             plain body\n\
             --XX\n\
             Content-Type: text/html; charset=utf-8\n\
             \n\
             <p>html body</p>\n\
             --XX--\n",
        );
        assert_eq!(m.text_plain.len(), 1);
        assert!(m.text_plain[0].contains("plain body"));
        assert_eq!(m.text_html.len(), 1);
        assert!(m.text_html[0].contains("<p>html body</p>"));
    }

    #[test]
    fn attachments_are_not_body_candidates() {
        let m = parse_str(
            "Subject: with file\n\
             Content-Type: multipart/mixed; boundary=\"B\"\n\
             \n\
             --B\n\
             Content-Type: text/plain\n\
             \n\
             see attached\n\
             --B\n\
             Content-Type: text/plain\n\
             Content-Disposition: attachment; filename=\"notes.txt\"\n\
             \n\
             secret notes\n\
             --B--\n",
        );
        assert_eq!(m.text_plain.len(), 1);
        assert!(m.text_plain[0].contains("see attached"));
    }

    #[test]
    fn quoted_printable_body_is_decoded() {
        let m = parse_str(
            "Subject: qp\n\
             Content-Type: text/plain; charset=utf-8\n\
             Content-Transfer-Encoding: quoted-printable\n\
             \n\
             caf=C3=A9\n",
        );
        assert!(m.text_plain[0].contains("café"));
    }

    #[test]
    fn empty_file_is_not_a_message() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty");
        fs::write(&path, b"").unwrap();
        let err = ParsedMessage::parse(&path).unwrap_err();
        assert!(matches!(err, MailError::NotAMessage(_)));
    }

    #[test]
    fn blank_file_is_not_a_message() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blank");
        fs::write(&path, b" \r\n\n").unwrap();
        let err = ParsedMessage::parse(&path).unwrap_err();
        assert!(matches!(err, MailError::NotAMessage(_)));
    }

    #[test]
    fn headerless_body_is_still_a_message() {
        let m = parse_str("\nHello\n");
        assert!(m.headers.is_empty());
        assert!(m.subject.is_none());
        assert_eq!(m.text_plain.len(), 1);
        assert!(m.text_plain[0].contains("Hello"));
    }

    #[test]
    fn unreadable_path_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = ParsedMessage::parse(tmp.path()).unwrap_err();
        assert!(matches!(err, MailError::Read { .. }));
    }
}
