use crate::address::Address;
use crate::error::{EngineError, Result};
use crate::membership::MemberListEntry;

const TYPE_JOINREQ: u8 = 0;
const TYPE_JOINREP: u8 = 1;
const TYPE_DELETE: u8 = 2;
const TYPE_PING: u8 = 3;
const TYPE_PINGREQ: u8 = 4;
const TYPE_ACK: u8 = 5;

const ADDR_LEN: usize = 6;

/// The six wire message variants. Every message carries `src` and `end`;
/// `end` names the ultimate subject (probe target for PING/PINGREQ/ACK,
/// victim for DELETE) and equals `src` when not otherwise meaningful.
/// JOINREQ/JOINREP additionally carry a snapshot of the sender's
/// membership list.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    JoinReq {
        src: Address,
        end: Address,
        members: Vec<MemberListEntry>,
    },
    JoinRep {
        src: Address,
        end: Address,
        members: Vec<MemberListEntry>,
    },
    Ping {
        src: Address,
        end: Address,
    },
    PingReq {
        src: Address,
        end: Address,
    },
    Ack {
        src: Address,
        end: Address,
    },
    Delete {
        src: Address,
        end: Address,
    },
}

impl Message {
    pub fn src(&self) -> Address {
        match *self {
            Message::JoinReq { src, .. }
            | Message::JoinRep { src, .. }
            | Message::Ping { src, .. }
            | Message::PingReq { src, .. }
            | Message::Ack { src, .. }
            | Message::Delete { src, .. } => src,
        }
    }

    pub fn end(&self) -> Address {
        match *self {
            Message::JoinReq { end, .. }
            | Message::JoinRep { end, .. }
            | Message::Ping { end, .. }
            | Message::PingReq { end, .. }
            | Message::Ack { end, .. }
            | Message::Delete { end, .. } => end,
        }
    }
}

fn push_addr(out: &mut Vec<u8>, addr: Address) {
    out.extend_from_slice(&addr.id.to_le_bytes());
    out.extend_from_slice(&addr.port.to_le_bytes());
}

fn read_addr(bytes: &[u8], offset: usize) -> Result<(Address, usize)> {
    if bytes.len() < offset + ADDR_LEN {
        return Err(EngineError::Codec("truncated address".into()));
    }
    let id = u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap());
    let port = u16::from_le_bytes(bytes[offset + 4..offset + 6].try_into().unwrap());
    Ok((Address::new(id, port), offset + ADDR_LEN))
}

fn push_members(out: &mut Vec<u8>, members: &[MemberListEntry]) {
    out.extend_from_slice(&(members.len() as u32).to_le_bytes());
    for m in members {
        out.extend_from_slice(&m.id.to_le_bytes());
        out.extend_from_slice(&m.port.to_le_bytes());
    }
}

fn read_members(bytes: &[u8], mut offset: usize) -> Result<(Vec<MemberListEntry>, usize)> {
    if bytes.len() < offset + 4 {
        return Err(EngineError::Codec("truncated member count".into()));
    }
    let count = u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap()) as usize;
    offset += 4;

    let mut members = Vec::with_capacity(count);
    for _ in 0..count {
        if bytes.len() < offset + ADDR_LEN {
            return Err(EngineError::Codec("truncated member entry".into()));
        }
        let id = u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap());
        let port = u16::from_le_bytes(bytes[offset + 4..offset + 6].try_into().unwrap());
        members.push(MemberListEntry::new(id, port));
        offset += ADDR_LEN;
    }
    Ok((members, offset))
}

/// Encode a message to its wire representation.
///
/// Framing is length-prefixed by the transport, not by the codec; `encode`
/// only produces the message body (type byte, two addresses, and for
/// JOIN* variants the membership snapshot).
pub fn encode(msg: &Message) -> Vec<u8> {
    let mut out = Vec::new();
    match msg {
        Message::JoinReq { src, end, members } => {
            out.push(TYPE_JOINREQ);
            push_addr(&mut out, *src);
            push_addr(&mut out, *end);
            push_members(&mut out, members);
        }
        Message::JoinRep { src, end, members } => {
            out.push(TYPE_JOINREP);
            push_addr(&mut out, *src);
            push_addr(&mut out, *end);
            push_members(&mut out, members);
        }
        Message::Ping { src, end } => {
            out.push(TYPE_PING);
            push_addr(&mut out, *src);
            push_addr(&mut out, *end);
        }
        Message::PingReq { src, end } => {
            out.push(TYPE_PINGREQ);
            push_addr(&mut out, *src);
            push_addr(&mut out, *end);
        }
        Message::Ack { src, end } => {
            out.push(TYPE_ACK);
            push_addr(&mut out, *src);
            push_addr(&mut out, *end);
        }
        Message::Delete { src, end } => {
            out.push(TYPE_DELETE);
            push_addr(&mut out, *src);
            push_addr(&mut out, *end);
        }
    }
    out
}

/// Decode a message from its wire representation.
pub fn decode(bytes: &[u8]) -> Result<Message> {
    if bytes.is_empty() {
        return Err(EngineError::Codec("empty message".into()));
    }
    let tag = bytes[0];
    let (src, offset) = read_addr(bytes, 1)?;
    let (end, offset) = read_addr(bytes, offset)?;

    match tag {
        TYPE_JOINREQ => {
            let (members, _) = read_members(bytes, offset)?;
            Ok(Message::JoinReq { src, end, members })
        }
        TYPE_JOINREP => {
            let (members, _) = read_members(bytes, offset)?;
            Ok(Message::JoinRep { src, end, members })
        }
        TYPE_PING => Ok(Message::Ping { src, end }),
        TYPE_PINGREQ => Ok(Message::PingReq { src, end }),
        TYPE_ACK => Ok(Message::Ack { src, end }),
        TYPE_DELETE => Ok(Message::Delete { src, end }),
        other => Err(EngineError::Codec(format!("unknown message type {other}"))),
    }
}
