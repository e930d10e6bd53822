use core::fmt::Debug;
use std::fmt::Display;
use std::sync::OnceLock;

use regex::Regex;

use crate::TermId;

/// The columns of a GO annotation (gene association) line
///
/// See <http://geneontology.org/docs/go-annotation-file-gaf-format-2.2/>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationField {
    /// Database contributing the annotation, e.g. `SGD`
    Db,
    /// Unique identifier of the item in `Db`
    DbObjectId,
    /// Symbol of the item, e.g. the gene symbol
    DbObjectSymbol,
    /// Qualifiers such as `NOT` or `contributes_to`
    Qualifier,
    /// The GO term id
    GoId,
    /// Reference(s) for the annotation
    DbReference,
    /// Evidence code, e.g. `IDA`
    EvidenceCode,
    /// `with` or `from` information for some evidence codes
    WithOrFrom,
    /// `P` (biological process), `F` (molecular function) or `C` (cellular component)
    Aspect,
    /// Full name of the item
    DbObjectName,
    /// Pipe separated synonyms of the item
    DbObjectSynonym,
    /// Type of the item, e.g. `gene`
    DbObjectType,
    /// Taxon of the item
    Taxon,
    /// Date of the annotation
    Date,
    /// Database that made the annotation
    AssignedBy,
}

impl AnnotationField {
    /// All fields in column order
    pub const ALL: [AnnotationField; 15] = [
        AnnotationField::Db,
        AnnotationField::DbObjectId,
        AnnotationField::DbObjectSymbol,
        AnnotationField::Qualifier,
        AnnotationField::GoId,
        AnnotationField::DbReference,
        AnnotationField::EvidenceCode,
        AnnotationField::WithOrFrom,
        AnnotationField::Aspect,
        AnnotationField::DbObjectName,
        AnnotationField::DbObjectSynonym,
        AnnotationField::DbObjectType,
        AnnotationField::Taxon,
        AnnotationField::Date,
        AnnotationField::AssignedBy,
    ];

    /// The 0-based column index of the field
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The canonical name of the field, e.g. `DB_Object_Symbol`
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationField::Db => "DB",
            AnnotationField::DbObjectId => "DB_Object_ID",
            AnnotationField::DbObjectSymbol => "DB_Object_Symbol",
            AnnotationField::Qualifier => "Qualifier",
            AnnotationField::GoId => "GO_ID",
            AnnotationField::DbReference => "DB_Reference",
            AnnotationField::EvidenceCode => "Evidence_code",
            AnnotationField::WithOrFrom => "With_or_From",
            AnnotationField::Aspect => "Aspect",
            AnnotationField::DbObjectName => "DB_Object_Name",
            AnnotationField::DbObjectSynonym => "DB_Object_Synonym",
            AnnotationField::DbObjectType => "DB_Object_Type",
            AnnotationField::Taxon => "taxon",
            AnnotationField::Date => "Date",
            AnnotationField::AssignedBy => "Assigned_by",
        }
    }

    /// The column title used in the file format description, e.g. `DB Object Symbol`
    pub fn title(&self) -> &'static str {
        match self {
            AnnotationField::Db => "DB",
            AnnotationField::DbObjectId => "DB Object ID",
            AnnotationField::DbObjectSymbol => "DB Object Symbol",
            AnnotationField::Qualifier => "Qualifier",
            AnnotationField::GoId => "GO ID",
            AnnotationField::DbReference => "DB:Reference",
            AnnotationField::EvidenceCode => "Evidence Code",
            AnnotationField::WithOrFrom => "With (or) From",
            AnnotationField::Aspect => "Aspect",
            AnnotationField::DbObjectName => "DB Object Name",
            AnnotationField::DbObjectSynonym => "DB Object Synonym",
            AnnotationField::DbObjectType => "DB Object Type",
            AnnotationField::Taxon => "Taxon",
            AnnotationField::Date => "Date",
            AnnotationField::AssignedBy => "Assigned By",
        }
    }

    /// Looks up a field by its canonical name or its column title
    ///
    /// # Examples
    ///
    /// ```
    /// use goenrich::annotations::AnnotationField;
    ///
    /// assert_eq!(AnnotationField::from_name("GO_ID"), Some(AnnotationField::GoId));
    /// assert_eq!(AnnotationField::from_name("GO ID"), Some(AnnotationField::GoId));
    /// assert_eq!(AnnotationField::from_name("Foobar"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == name || field.title() == name)
    }
}

impl Display for AnnotationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Tokens of the object name that are used as additional aliases
fn alias_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("[A-Za-z0-9_-]+").expect("the pattern is a valid regex"))
}

/// A single annotation, i.e. one line of a gene association file
///
/// Besides all raw columns, the record provides quick access to the
/// most important values and to the aliases of the annotated item.
///
/// # Examples
///
/// ```
/// use goenrich::annotations::{AnnotationField, AnnotationRecord};
///
/// let line = "SGD\tS000007287\t15S_RRNA\t\tGO:0005763\tSGD_REF:S000073642|PMID:6262831\tISS\t\tC\t15S: ribosomal RNA of the small mitochondrial ribosomal subunit\t15S_rRNA|15S_RRNA_2\tgene\ttaxon:4932\t20040202\tSGD";
/// let record = AnnotationRecord::parse(line);
///
/// assert_eq!(record.gene_name(), "15S_RRNA");
/// assert_eq!(record.term_id(), "GO:0005763");
/// assert_eq!(record.evidence(), "ISS");
/// assert_eq!(record.aspect(), "C");
/// assert_eq!(record.aliases(), ["15S_rRNA", "15S_RRNA_2"]);
/// assert_eq!(record.additional_aliases(), ["15S"]);
/// assert_eq!(record.field(AnnotationField::Taxon), "taxon:4932");
/// assert_eq!(record.get("DB Object ID"), Some("S000007287"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    columns: Vec<String>,
    term_id: TermId,
    aliases: Vec<String>,
    additional_aliases: Vec<String>,
}

impl AnnotationRecord {
    /// Parses a tab separated annotation line
    ///
    /// Missing trailing columns are treated as empty values
    pub fn parse(line: &str) -> Self {
        let columns: Vec<String> = line
            .split('\t')
            .map(|col| col.trim().to_string())
            .collect();

        let value = |field: AnnotationField| {
            columns
                .get(field.index())
                .map_or("", String::as_str)
        };

        let term_id = TermId::from(value(AnnotationField::GoId));

        let aliases = value(AnnotationField::DbObjectSynonym)
            .split('|')
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
            .map(String::from)
            .collect();

        let name = value(AnnotationField::DbObjectName);
        let additional_aliases = match name.split_once(':') {
            Some((prefix, _)) => alias_token()
                .find_iter(prefix)
                .map(|m| m.as_str().to_string())
                .collect(),
            None => Vec::new(),
        };

        Self {
            columns,
            term_id,
            aliases,
            additional_aliases,
        }
    }

    /// Returns the value of the field
    ///
    /// Fields that are not present in the line are empty
    pub fn field(&self, field: AnnotationField) -> &str {
        self.columns.get(field.index()).map_or("", String::as_str)
    }

    /// Returns the value of the field with the canonical name or column title
    ///
    /// Returns `None` if no such field exists
    pub fn get(&self, name: &str) -> Option<&str> {
        AnnotationField::from_name(name).map(|field| self.field(field))
    }

    /// Returns all raw columns of the line
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The primary name of the annotated item (the object symbol)
    pub fn gene_name(&self) -> &str {
        self.field(AnnotationField::DbObjectSymbol)
    }

    /// The id of the annotated item in the contributing database
    pub fn object_id(&self) -> &str {
        self.field(AnnotationField::DbObjectId)
    }

    /// The GO term of the annotation
    pub fn term_id(&self) -> &TermId {
        &self.term_id
    }

    /// The evidence code of the annotation
    pub fn evidence(&self) -> &str {
        self.field(AnnotationField::EvidenceCode)
    }

    /// The aspect code (`P`, `F` or `C`) of the annotation
    pub fn aspect(&self) -> &str {
        self.field(AnnotationField::Aspect)
    }

    /// The synonyms of the annotated item
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Aliases taken from the prefix of the object name
    ///
    /// Object names like `ABC1: some description` also provide the alias `ABC1`
    pub fn additional_aliases(&self) -> &[String] {
        &self.additional_aliases
    }
}

impl Debug for AnnotationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AnnotationRecord({} - {} [{}])",
            self.gene_name(),
            self.term_id,
            self.evidence()
        )
    }
}

impl Display for AnnotationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.columns.join("\t"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn line(symbol: &str, term: &str, name: &str, synonyms: &str) -> String {
        format!("SGD\tS1\t{symbol}\t\t{term}\tPMID:1\tIDA\t\tP\t{name}\t{synonyms}\tgene\ttaxon:4932\t20070101\tSGD")
    }

    #[test]
    fn parse_complete_line() {
        let record = AnnotationRecord::parse(&line("AAC1", "GO:0006810", "ADP/ATP carrier", "YMR056C"));
        assert_eq!(record.columns().len(), 15);
        assert_eq!(record.gene_name(), "AAC1");
        assert_eq!(record.object_id(), "S1");
        assert_eq!(record.term_id(), "GO:0006810");
        assert_eq!(record.aspect(), "P");
        assert_eq!(record.aliases(), ["YMR056C"]);
        assert!(record.additional_aliases().is_empty());
    }

    #[test]
    fn empty_synonyms() {
        let record = AnnotationRecord::parse(&line("AAC1", "GO:1", "name", ""));
        assert!(record.aliases().is_empty());

        let record = AnnotationRecord::parse(&line("AAC1", "GO:1", "name", "A||B"));
        assert_eq!(record.aliases(), ["A", "B"]);
    }

    #[test]
    fn additional_aliases_from_name() {
        let record = AnnotationRecord::parse(&line("X", "GO:1", "RPL1A, rpl-1_b: large subunit", ""));
        assert_eq!(record.additional_aliases(), ["RPL1A", "rpl-1_b"]);
    }

    #[test]
    fn short_line() {
        let record = AnnotationRecord::parse("SGD\tS1\tAAC1");
        assert_eq!(record.gene_name(), "AAC1");
        assert_eq!(record.term_id().as_str(), "");
        assert_eq!(record.field(AnnotationField::AssignedBy), "");
    }

    #[test]
    fn columns_are_trimmed() {
        let record = AnnotationRecord::parse(&line(" AAC1 ", "GO:1 ", "n", ""));
        assert_eq!(record.gene_name(), "AAC1");
        assert_eq!(record.term_id(), "GO:1");
    }

    #[test]
    fn lookup_by_name() {
        let record = AnnotationRecord::parse(&line("AAC1", "GO:1", "n", ""));
        assert_eq!(record.get("Evidence_code"), Some("IDA"));
        assert_eq!(record.get("Evidence Code"), Some("IDA"));
        assert_eq!(record.get("Assigned_by"), Some("SGD"));
        assert_eq!(record.get("geneName"), None);
    }

    #[test]
    fn field_order() {
        for (idx, field) in AnnotationField::ALL.iter().enumerate() {
            assert_eq!(field.index(), idx);
        }
    }
}
