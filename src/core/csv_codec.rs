use crate::domain::model::StudentRecord;
use crate::utils::error::{RosterError, Result};
use chrono::NaiveDate;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};

pub const CSV_HEADER: [&str; 7] = [
    "Фамилия",
    "Имя",
    "Отчество",
    "Курс",
    "Группа",
    "Дата рождения",
    "Email",
];

pub const EXPORT_DATE_FORMAT: &str = "%d.%m.%Y";

/// 匯入時接受的日期格式 (第一個與匯出格式相同)
const IMPORT_DATE_FORMATS: [&str; 4] = ["%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

pub const FIELD_COUNT: usize = 7;

/// One data row of an import file, already split on commas.
#[derive(Debug, Clone)]
pub struct CsvRow {
    pub line: usize,
    pub fields: StringRecord,
}

/// Splits CSV text into data rows. The header line is skipped, commas are
/// literal separators (no quoting) and rows shorter than seven fields are
/// dropped with a warning.
pub fn read_rows(content: &str) -> Result<Vec<CsvRow>> {
    // 第一行一律視為標題，即使是空行
    let body = content.split_once('\n').map(|(_, rest)| rest).unwrap_or("");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let fields = result?;
        let line = fields.position().map(|p| p.line() as usize + 1).unwrap_or(0);

        if fields.len() < FIELD_COUNT {
            tracing::warn!(
                "Skipping CSV line {}: expected {} fields, found {}",
                line,
                FIELD_COUNT,
                fields.len()
            );
            continue;
        }

        rows.push(CsvRow { line, fields });
    }

    Ok(rows)
}

/// Builds a record from a row, assigning fields in column order so that the
/// first bad column is the one reported.
pub fn parse_row(row: &CsvRow) -> Result<StudentRecord> {
    let field = |i: usize| row.fields.get(i).unwrap_or_default();

    let mut record = StudentRecord::new();
    record.last_name = field(0).to_string();
    record.first_name = field(1).to_string();
    record.middle_name = field(2).to_string();
    record.course = field(3).trim().parse::<i32>().map_err(|e| RosterError::Parse {
        line: row.line,
        field: "course".to_string(),
        value: field(3).to_string(),
        reason: e.to_string(),
    })?;
    record.group = field(4).to_string();

    let birth_date = parse_date(field(5)).ok_or_else(|| RosterError::Parse {
        line: row.line,
        field: "birth_date".to_string(),
        value: field(5).to_string(),
        reason: "expected a date like dd.MM.yyyy".to_string(),
    })?;
    record.set_birth_date(birth_date)?;
    record.set_email(field(6))?;

    Ok(record)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    IMPORT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// 產生匯出用的 CSV 內容：固定標題列，之後每筆記錄一行，不加引號
pub fn render(records: &[StudentRecord]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in records {
        let course = record.course.to_string();
        let birth_date = record.birth_date().format(EXPORT_DATE_FORMAT).to_string();
        writer.write_record([
            record.last_name.as_str(),
            record.first_name.as_str(),
            record.middle_name.as_str(),
            course.as_str(),
            record.group.as_str(),
            birth_date.as_str(),
            record.email(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| RosterError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("01.05.2002"), Some(date(2002, 5, 1)));
        assert_eq!(parse_date("1.5.2002"), Some(date(2002, 5, 1)));
        assert_eq!(parse_date(" 2002-05-01 "), Some(date(2002, 5, 1)));
        assert_eq!(parse_date("01/05/2002"), Some(date(2002, 5, 1)));
        assert_eq!(parse_date("31.02.2002"), None);
        assert_eq!(parse_date("May 1st"), None);
    }

    #[test]
    fn test_read_rows_skips_header_and_short_lines() {
        let content = "Фамилия,Имя,Отчество,Курс,Группа,Дата рождения,Email\n\
                       Иванов,Иван,Иванович,2,Г-21,01.05.2002,ivan@gmail.com\n\
                       too,short\n\
                       Петров,Пётр,Петрович,3,Г-31,02.06.2001,petr@yandex.ru,extra\n";
        let rows = read_rows(content).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(&rows[0].fields[0], "Иванов");
        assert_eq!(rows[1].line, 4);
        assert_eq!(rows[1].fields.len(), 8);
    }

    #[test]
    fn test_read_rows_treats_quotes_literally() {
        let content = "header\n\"Иванов\",Иван,Иванович,2,\"Г,21\",01.05.2002,ivan@gmail.com\n";
        let rows = read_rows(content).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields.len(), 8);
        assert_eq!(&rows[0].fields[0], "\"Иванов\"");
        assert_eq!(&rows[0].fields[4], "\"Г");
    }

    #[test]
    fn test_read_rows_blank_first_line_is_the_header() {
        let rows = read_rows("\nИванов,Иван,Иванович,2,Г-21,01.05.2002,ivan@gmail.com\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 2);
        assert_eq!(&rows[0].fields[0], "Иванов");
    }

    #[test]
    fn test_read_rows_header_after_blank_lines_is_data() {
        let content = "\n\nФамилия,Имя,Отчество,Курс,Группа,Дата рождения,Email\n\
                       Иванов,Иван,Иванович,2,Г-21,01.05.2002,ivan@gmail.com\n";
        let rows = read_rows(content).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 3);
        assert!(matches!(
            parse_row(&rows[0]),
            Err(RosterError::Parse { line: 3, .. })
        ));
        assert_eq!(&rows[1].fields[0], "Иванов");
    }

    #[test]
    fn test_read_rows_header_only() {
        assert!(read_rows("Фамилия,Имя\n").unwrap().is_empty());
        assert!(read_rows("").unwrap().is_empty());
        assert!(read_rows("Фамилия,Имя,Отчество,Курс,Группа,Дата рождения,Email").unwrap().is_empty());
    }

    #[test]
    fn test_parse_row_reports_bad_course() {
        let rows = read_rows("h\nИванов,Иван,Иванович,two,Г-21,01.05.2002,ivan@gmail.com\n").unwrap();
        match parse_row(&rows[0]) {
            Err(RosterError::Parse { line, field, value, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(field, "course");
                assert_eq!(value, "two");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_row_reports_bad_date_and_email() {
        let rows = read_rows(
            "h\n\
             Иванов,Иван,Иванович,2,Г-21,someday,ivan@gmail.com\n\
             Иванов,Иван,Иванович,2,Г-21,01.05.1990,ivan@gmail.com\n\
             Иванов,Иван,Иванович,2,Г-21,01.05.2002,ivan@mail.ru\n",
        )
        .unwrap();
        assert!(matches!(parse_row(&rows[0]), Err(RosterError::Parse { .. })));
        assert!(matches!(parse_row(&rows[1]), Err(RosterError::Validation { .. })));
        assert!(matches!(parse_row(&rows[2]), Err(RosterError::Validation { .. })));
    }

    #[test]
    fn test_render_example_row() {
        let record = StudentRecord::try_new(
            "Иванов",
            "Иван",
            "Иванович",
            2,
            "Г-21",
            date(2002, 5, 1),
            "ivan@gmail.com",
        )
        .unwrap();
        let text = String::from_utf8(render(&[record]).unwrap()).unwrap();
        assert_eq!(
            text,
            "Фамилия,Имя,Отчество,Курс,Группа,Дата рождения,Email\n\
             Иванов,Иван,Иванович,2,Г-21,01.05.2002,ivan@gmail.com\n"
        );
    }

    #[test]
    fn test_render_empty_roster_writes_header_only() {
        let text = String::from_utf8(render(&[]).unwrap()).unwrap();
        assert_eq!(text, "Фамилия,Имя,Отчество,Курс,Группа,Дата рождения,Email\n");
    }
}
