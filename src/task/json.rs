use std::io::{Read, Write};

/// JSON document tree used by task files. Object members keep their file order.
#[derive(Clone,Debug,PartialEq)]
pub enum Json {
    Null,
    Bool(bool),
    Int(i64),
    Num(f64),
    Text(String),
    Arr(Vec<Json>),
    Obj(Vec<(String,Json)>),
}

fn bad(pos : usize, msg : &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData,format!("task file: {} (offset {})",msg,pos))
}

fn emit_text<W : Write>(out : &mut W, text : &str) -> std::io::Result<()> {
    out.write_all(b"\"")?;
    for ch in text.chars() {
        match ch {
            '"'  => out.write_all(b"\\\"")?,
            '\\' => out.write_all(b"\\\\")?,
            '\n' => out.write_all(b"\\n")?,
            '\r' => out.write_all(b"\\r")?,
            '\t' => out.write_all(b"\\t")?,
            c if (c as u32) < 0x20 => write!(out,"\\u{:04x}",c as u32)?,
            c => write!(out,"{}",c)?,
        }
    }
    out.write_all(b"\"")
}

impl Json {
    /// Serialize. Infinite numbers are written as out-of-range literals (`1e400`) that read back
    /// as infinities; NaN becomes `null`.
    pub fn emit<W : Write>(&self, out : &mut W) -> std::io::Result<()> {
        match self {
            Json::Null    => out.write_all(b"null"),
            Json::Bool(b) => write!(out,"{}",b),
            Json::Int(i)  => write!(out,"{}",i),
            Json::Num(v) if v.is_nan() => out.write_all(b"null"),
            Json::Num(v) if v.is_infinite() => out.write_all(if *v < 0.0 { b"-1e400" } else { b"1e400" }),
            Json::Num(v)  => write!(out,"{:e}",v),
            Json::Text(s) => emit_text(out,s),
            Json::Arr(items) => {
                out.write_all(b"[")?;
                for (i,item) in items.iter().enumerate() {
                    if i > 0 { out.write_all(b",")?; }
                    item.emit(out)?;
                }
                out.write_all(b"]")
            },
            Json::Obj(members) => {
                out.write_all(b"{")?;
                for (i,(k,v)) in members.iter().enumerate() {
                    if i > 0 { out.write_all(b",\n")?; }
                    emit_text(out,k)?;
                    out.write_all(b":")?;
                    v.emit(out)?;
                }
                out.write_all(b"}")
            },
        }
    }

    /// Parse a complete document. Only whitespace may follow the top level value.
    pub fn parse<R : Read>(src : &mut R) -> std::io::Result<Json> {
        let mut text = Vec::new();
        src.read_to_end(&mut text)?;
        let mut lx = Lexer { src : &text, at : 0, depth : 0 };
        let root = lx.document()?;
        match lx.token()? {
            Tok::End => Ok(root),
            _ => Err(bad(lx.at,"trailing data")),
        }
    }

    pub fn member(&self, name : &str) -> Option<&Json> {
        match self {
            Json::Obj(members) => members.iter().find(|(k,_)| k == name).map(|(_,v)| v),
            _ => None,
        }
    }

    pub fn num(&self) -> Option<f64> {
        match *self {
            Json::Num(v) => Some(v),
            Json::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    pub fn int(&self) -> Option<i64> {
        match *self { Json::Int(i) => Some(i), _ => None }
    }

    pub fn text(&self) -> Option<&str> {
        match self { Json::Text(s) => Some(s), _ => None }
    }

    pub fn items(&self) -> Option<&[Json]> {
        match self { Json::Arr(v) => Some(v), _ => None }
    }

    pub fn nums(v : &[f64]) -> Json { Json::Arr(v.iter().copied().map(Json::Num).collect()) }
    pub fn ints<I : IntoIterator<Item=i64>>(v : I) -> Json { Json::Arr(v.into_iter().map(Json::Int).collect()) }
}

#[derive(Debug,PartialEq)]
enum Tok {
    Open(u8),
    Close(u8),
    Comma,
    Colon,
    Scalar(Json),
    End,
}

/// Maximum nesting of arrays and objects.
const MAX_DEPTH : usize = 64;

struct Lexer<'a> {
    src   : &'a [u8],
    at    : usize,
    depth : usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<u8> { self.src.get(self.at).copied() }

    fn bump(&mut self) -> std::io::Result<u8> {
        let c = self.peek().ok_or_else(|| bad(self.at,"unexpected end of input"))?;
        self.at += 1;
        Ok(c)
    }

    fn token(&mut self) -> std::io::Result<Tok> {
        while matches!(self.peek(),Some(b' '|b'\n'|b'\r'|b'\t')) { self.at += 1; }
        let start = self.at;
        let Some(c) = self.peek() else { return Ok(Tok::End) };
        Ok(match c {
            b'[' | b'{' => { self.at += 1; Tok::Open(c) },
            b']' | b'}' => { self.at += 1; Tok::Close(c) },
            b',' => { self.at += 1; Tok::Comma },
            b':' => { self.at += 1; Tok::Colon },
            b'"' => Tok::Scalar(Json::Text(self.quoted()?)),
            b'-' | b'0'..=b'9' => {
                let len = self.src[start..].iter()
                    .take_while(|b| matches!(b,b'0'..=b'9'|b'-'|b'+'|b'.'|b'e'|b'E'))
                    .count();
                self.at += len;
                let lit = std::str::from_utf8(&self.src[start..self.at]).map_err(|_| bad(start,"bad number"))?;
                match lit.parse::<i64>() {
                    Ok(i) => Tok::Scalar(Json::Int(i)),
                    Err(_) => Tok::Scalar(Json::Num(lit.parse().map_err(|_| bad(start,"bad number"))?)),
                }
            },
            _ => {
                let len = self.src[start..].iter().take_while(|b| b.is_ascii_alphabetic()).count();
                self.at += len;
                match &self.src[start..self.at] {
                    b"null"  => Tok::Scalar(Json::Null),
                    b"true"  => Tok::Scalar(Json::Bool(true)),
                    b"false" => Tok::Scalar(Json::Bool(false)),
                    _ => return Err(bad(start,"unexpected input")),
                }
            },
        })
    }

    fn quoted(&mut self) -> std::io::Result<String> {
        self.bump()?;
        let mut buf = Vec::new();
        loop {
            match self.bump()? {
                b'"' => break,
                b'\\' => match self.bump()? {
                    b'n' => buf.push(b'\n'),
                    b'r' => buf.push(b'\r'),
                    b't' => buf.push(b'\t'),
                    b'u' => {
                        let at = self.at;
                        let ch = self.src.get(at..at+4)
                            .and_then(|h| std::str::from_utf8(h).ok())
                            .and_then(|h| u32::from_str_radix(h,16).ok())
                            .and_then(char::from_u32)
                            .ok_or_else(|| bad(at,"bad unicode escape"))?;
                        self.at += 4;
                        buf.extend_from_slice(ch.to_string().as_bytes());
                    },
                    other => buf.push(other),
                },
                other => buf.push(other),
            }
        }
        String::from_utf8(buf).map_err(|_| bad(self.at,"invalid utf-8 in string"))
    }

    fn document(&mut self) -> std::io::Result<Json> {
        let t = self.token()?;
        self.value_from(t)
    }

    fn value_from(&mut self, t : Tok) -> std::io::Result<Json> {
        match t {
            Tok::Scalar(v) => Ok(v),
            Tok::Open(c) => {
                if self.depth == MAX_DEPTH { return Err(bad(self.at,"nesting too deep")); }
                self.depth += 1;
                let v = self.container(c);
                self.depth -= 1;
                v
            },
            Tok::End => Err(bad(self.at,"unexpected end of input")),
            _ => Err(bad(self.at,"unexpected token")),
        }
    }

    fn container(&mut self, open : u8) -> std::io::Result<Json> {
        match open {
            b'[' => {
                let mut items = Vec::new();
                let mut t = self.token()?;
                if t == Tok::Close(b']') { return Ok(Json::Arr(items)); }
                loop {
                    items.push(self.value_from(t)?);
                    match self.token()? {
                        Tok::Comma => t = self.token()?,
                        Tok::Close(b']') => return Ok(Json::Arr(items)),
                        _ => return Err(bad(self.at,"expected ',' or ']'")),
                    }
                }
            },
            _ => {
                let mut members = Vec::new();
                let mut t = self.token()?;
                if t == Tok::Close(b'}') { return Ok(Json::Obj(members)); }
                loop {
                    let Tok::Scalar(Json::Text(name)) = t else { return Err(bad(self.at,"expected member name")) };
                    if self.token()? != Tok::Colon { return Err(bad(self.at,"expected ':'")); }
                    let v = self.document()?;
                    members.push((name,v));
                    match self.token()? {
                        Tok::Comma => t = self.token()?,
                        Tok::Close(b'}') => return Ok(Json::Obj(members)),
                        _ => return Err(bad(self.at,"expected ',' or '}'")),
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reparse(v : &Json) -> Json {
        let mut buf = Vec::new();
        v.emit(&mut buf).unwrap();
        Json::parse(&mut buf.as_slice()).unwrap()
    }

    #[test]
    fn document_members() {
        let v = Json::Obj(vec![
            ("name".to_string(), Json::Text("a \"quoted\"\nname\u{1}".to_string())),
            ("values".to_string(), Json::nums(&[1.5, -2.0, 1e20])),
            ("ints".to_string(), Json::ints([1,-2,3])),
            ("empty".to_string(), Json::Arr(vec![])),
            ("nested".to_string(), Json::Obj(vec![])),
            ("flag".to_string(), Json::Bool(true)),
            ("nothing".to_string(), Json::Null),
        ]);
        let r = reparse(&v);
        assert_eq!(r.member("name").and_then(Json::text), Some("a \"quoted\"\nname\u{1}"));
        let vals : Vec<f64> = r.member("values").and_then(Json::items).unwrap().iter().filter_map(Json::num).collect();
        assert_eq!(vals, vec![1.5,-2.0,1e20]);
        assert_eq!(r.member("ints").and_then(Json::items).map(|l| l.len()), Some(3));
        assert_eq!(r.member("nested"), Some(&Json::Obj(vec![])));
        assert_eq!(r.member("flag"), Some(&Json::Bool(true)));
        assert_eq!(r.member("nothing"), Some(&Json::Null));
        assert_eq!(r.member("missing"), None);
    }

    #[test]
    fn infinities() {
        let r = reparse(&Json::nums(&[f64::INFINITY, f64::NEG_INFINITY]));
        let v : Vec<f64> = r.items().unwrap().iter().filter_map(Json::num).collect();
        assert_eq!(v, vec![f64::INFINITY, f64::NEG_INFINITY]);
    }

    #[test]
    fn nesting_limit() {
        let ok = format!("{}{}","[".repeat(MAX_DEPTH),"]".repeat(MAX_DEPTH));
        assert!(Json::parse(&mut ok.as_bytes()).is_ok());
        let deep = format!("{}{}","[".repeat(MAX_DEPTH+1),"]".repeat(MAX_DEPTH+1));
        assert!(Json::parse(&mut deep.as_bytes()).is_err());
        assert!(Json::parse(&mut "{\"a\":".repeat(100_000).as_bytes()).is_err());
    }

    #[test]
    fn syntax_errors() {
        for src in ["[1,2", "{\"a\" 1}", "[1] x", "tru", "{1:2}", "[1,]", ""] {
            assert!(Json::parse(&mut src.as_bytes()).is_err(), "{:?}", src);
        }
    }
}
